//! Turning flat directory listings into versions by decoding file names
//!
//! Mirror listings only offer a file name, a link and a size per row, so the
//! version, kind, OS and architecture are all read off names such as
//! `go1.21.4.linux-amd64.tar.gz`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Error;
use crate::version::collection::sort_versions;
use crate::version::package::{Package, PackageKind, SHA256};
use crate::version::types::Version;

/// OS tokens as they appear between the version and the architecture,
/// checked in order
const OS_LABELS: [(&str, &str); 11] = [
    ("linux", "Linux"),
    ("darwin", "macOS"),
    ("windows", "Windows"),
    ("freebsd", "FreeBSD"),
    ("netbsd", "netbsd"),
    ("openbsd", "openbsd"),
    ("solaris", "solaris"),
    ("plan9", "plan9"),
    ("aix", "aix"),
    ("dragonfly", "dragonfly"),
    ("illumos", "illumos"),
];

/// Architecture tokens as they appear before the extension, checked in order
const ARCH_LABELS: [(&str, &str); 14] = [
    ("386", "x86"),
    ("amd64", "x86-64"),
    ("arm", "ARMv6"),
    ("arm64", "ARM64"),
    ("armv6l", "ARMv6"),
    ("ppc64", "ppc64"),
    ("ppc64le", "ppc64le"),
    ("mips", "mips"),
    ("mipsle", "mipsle"),
    ("mips64", "mips64"),
    ("mips64le", "mips64le"),
    ("s390x", "s390x"),
    ("riscv64", "riscv64"),
    ("loong64", "loong64"),
];

/// One row of a flat listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub file_name: String,
    pub url: String,
    pub size: String,
}

impl FileItem {
    pub fn new(
        file_name: impl Into<String>,
        url: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            url: url.into(),
            size: size.into(),
        }
    }

    /// Version name embedded in the file name.
    ///
    /// Keeps as many leading dot-separated parts as start with a digit:
    /// `go1.21.4.linux-amd64.tar.gz` -> `1.21.4`,
    /// `go1.21rc4.src.tar.gz` -> `1.21rc4`. Names with fewer than three parts
    /// or without a leading digit carry no version.
    pub fn go_version(&self) -> Option<String> {
        let trimmed = self.file_name.strip_prefix("go").unwrap_or(&self.file_name);
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() < 3 || !starts_with_digit(parts[0]) {
            return None;
        }

        if starts_with_digit(parts[2]) {
            return Some(parts[..3].join("."));
        }
        if starts_with_digit(parts[1]) {
            return Some(parts[..2].join("."));
        }
        Some(parts[0].to_string())
    }

    pub fn is_sha256_file(&self) -> bool {
        self.file_name.ends_with(".sha256")
    }

    pub fn is_package_file(&self) -> bool {
        [".tar.gz", ".pkg", ".zip", ".msi"]
            .iter()
            .any(|ext| self.file_name.ends_with(ext))
    }

    pub fn kind(&self) -> PackageKind {
        let name = &self.file_name;
        if name.ends_with(".src.tar.gz") {
            PackageKind::Source
        } else if name.ends_with(".tar.gz") || name.ends_with(".zip") {
            PackageKind::Archive
        } else if name.ends_with(".pkg") || name.ends_with(".msi") {
            PackageKind::Installer
        } else {
            PackageKind::Unknown
        }
    }

    /// Display label of the target OS, empty for source tarballs
    pub fn os(&self) -> &'static str {
        OS_LABELS
            .iter()
            .find(|(token, _)| self.file_name.contains(&format!(".{}-", token)))
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }

    /// Display label of the target architecture, empty for source tarballs
    pub fn arch(&self) -> &'static str {
        ARCH_LABELS
            .iter()
            .find(|(token, _)| self.file_name.contains(&format!("-{}.", token)))
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }

    fn to_package(&self) -> Package {
        Package {
            file_name: self.file_name.clone(),
            url: self.url.clone(),
            kind: self.kind(),
            os: self.os().to_string(),
            arch: self.arch().to_string(),
            size: self.size.clone(),
            checksum: String::new(),
            checksum_url: String::new(),
            algorithm: String::new(),
        }
    }
}

fn starts_with_digit(part: &str) -> bool {
    part.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Group listing rows into sorted versions.
///
/// Package files are grouped by the version in their name. A `.sha256`
/// sidecar then becomes the checksum source of every package of the same
/// version whose file name prefixes the sidecar's. Rows without a version,
/// and rows that are neither packages nor sidecars, are dropped.
pub fn convert_to_versions(items: &[FileItem]) -> Result<Vec<Version>, Error> {
    let mut groups: BTreeMap<String, Vec<Package>> = BTreeMap::new();
    let mut sidecars = Vec::new();

    for item in items {
        let Some(name) = item.go_version() else {
            debug!("Skipping {}: no version in file name", item.file_name);
            continue;
        };

        if item.is_package_file() {
            groups.entry(name).or_default().push(item.to_package());
        } else if item.is_sha256_file() {
            sidecars.push((name, item));
        }
    }

    for (name, sidecar) in sidecars {
        let Some(packages) = groups.get_mut(&name) else {
            continue;
        };
        for pkg in packages
            .iter_mut()
            .filter(|pkg| sidecar.file_name.starts_with(&pkg.file_name))
        {
            pkg.algorithm = SHA256.to_string();
            pkg.checksum_url = sidecar.url.clone();
        }
    }

    let mut versions = groups
        .into_iter()
        .map(|(name, packages)| -> Result<Version, Error> {
            Ok(Version::new(name)?.with_packages(packages))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    debug!("Decoded {} versions from {} rows", versions.len(), items.len());
    sort_versions(&mut versions);
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &str = "https://mirrors.example.org/golang/";

    fn item(file_name: &str) -> FileItem {
        FileItem::new(file_name, format!("{}{}", BASE, file_name), "63M")
    }

    #[rstest]
    #[case("go1.21.4.linux-amd64.tar.gz", Some("1.21.4"))]
    #[case("go1.21.4.src.tar.gz", Some("1.21.4"))]
    #[case("go1.21rc4.darwin-arm64.pkg", Some("1.21rc4"))]
    #[case("go1.9.windows-386.msi", Some("1.9"))]
    #[case("go1.10beta2.linux-amd64.tar.gz.sha256", Some("1.10beta2"))]
    #[case("go1.linux-amd64.tar.gz", Some("1"))]
    #[case("golang-docs.tar.gz", None)]
    #[case("go.tar.gz", None)]
    #[case("getgo/", None)]
    fn go_version_returns_expected(#[case] file_name: &str, #[case] expected: Option<&str>) {
        assert_eq!(item(file_name).go_version().as_deref(), expected);
    }

    #[rstest]
    #[case("go1.21.4.linux-amd64.tar.gz", PackageKind::Archive, "Linux", "x86-64")]
    #[case("go1.21.4.src.tar.gz", PackageKind::Source, "", "")]
    #[case("go1.21.4.darwin-arm64.pkg", PackageKind::Installer, "macOS", "ARM64")]
    #[case("go1.21.4.windows-386.zip", PackageKind::Archive, "Windows", "x86")]
    #[case("go1.21.4.windows-arm64.msi", PackageKind::Installer, "Windows", "ARM64")]
    #[case("go1.21.4.linux-armv6l.tar.gz", PackageKind::Archive, "Linux", "ARMv6")]
    #[case("go1.21.4.linux-ppc64le.tar.gz", PackageKind::Archive, "Linux", "ppc64le")]
    #[case("go1.21.4.linux-mips64le.tar.gz", PackageKind::Archive, "Linux", "mips64le")]
    #[case("go1.21.4.freebsd-amd64.tar.gz", PackageKind::Archive, "FreeBSD", "x86-64")]
    #[case("go1.21.4.illumos-amd64.tar.gz", PackageKind::Archive, "illumos", "x86-64")]
    #[case("go1.21.4.linux-loong64.tar.gz", PackageKind::Archive, "Linux", "loong64")]
    #[case("go1.21.4.linux-amd64.tar.gz.asc", PackageKind::Unknown, "Linux", "x86-64")]
    fn decodes_kind_os_and_arch(
        #[case] file_name: &str,
        #[case] kind: PackageKind,
        #[case] os: &str,
        #[case] arch: &str,
    ) {
        let item = item(file_name);
        assert_eq!(item.kind(), kind);
        assert_eq!(item.os(), os);
        assert_eq!(item.arch(), arch);
    }

    #[test]
    fn convert_groups_packages_and_pairs_sidecars() {
        let items = vec![
            item("go1.21.4.linux-amd64.tar.gz.sha256"),
            item("go1.21.4.linux-amd64.tar.gz"),
            item("go1.21.4.src.tar.gz"),
            item("go1.21.4.src.tar.gz.sha256"),
            item("go1.21.4.linux-amd64.tar.gz.asc"),
            item("go1.20.11.darwin-arm64.pkg"),
            item("go1.21rc4.linux-amd64.tar.gz"),
            item("golang-docs.html"),
        ];

        let versions = convert_to_versions(&items).unwrap();
        let names: Vec<&str> = versions.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["1.20.11", "1.21rc4", "1.21.4"]);

        let latest = &versions[2];
        assert_eq!(latest.packages().len(), 2);

        let archive = &latest.packages()[0];
        assert_eq!(archive.file_name, "go1.21.4.linux-amd64.tar.gz");
        assert_eq!(archive.kind, PackageKind::Archive);
        assert_eq!(archive.os, "Linux");
        assert_eq!(archive.arch, "x86-64");
        assert_eq!(archive.size, "63M");
        assert_eq!(archive.algorithm, SHA256);
        assert_eq!(
            archive.checksum_url,
            format!("{}go1.21.4.linux-amd64.tar.gz.sha256", BASE)
        );
        assert!(archive.checksum.is_empty());

        let source = &latest.packages()[1];
        assert_eq!(source.kind, PackageKind::Source);
        assert_eq!(
            source.checksum_url,
            format!("{}go1.21.4.src.tar.gz.sha256", BASE)
        );

        let installer = &versions[0].packages()[0];
        assert!(installer.checksum_url.is_empty());
        assert!(installer.algorithm.is_empty());
    }

    #[test]
    fn sidecar_without_package_is_ignored() {
        let versions =
            convert_to_versions(&[item("go1.19.13.linux-amd64.tar.gz.sha256")]).unwrap();
        assert!(versions.is_empty());
    }

    #[test]
    fn malformed_version_aborts_conversion() {
        let err = convert_to_versions(&[
            item("go1.21.4.linux-amd64.tar.gz"),
            item("go1.2x.3.linux-amd64.tar.gz"),
        ])
        .unwrap_err();

        assert!(matches!(err, Error::MalformedVersion { ref version, .. } if version == "1.2x.3"));
    }
}
