//! The release value type shared by remote listings and installed versions

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::Error;
use crate::version::constraint::Constraint;
use crate::version::package::{Package, PackageKind};
use crate::version::semver::semantify;

/// One Go release: its original display name, the strict semantic version
/// derived from it and the packages published for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    #[serde(rename = "version")]
    name: String,
    #[serde(skip)]
    sv: semver::Version,
    packages: Vec<Package>,
}

impl Version {
    /// Creates a Version with no packages.
    ///
    /// Fails with `MalformedVersion` when the name cannot be coerced into a
    /// semantic version (e.g. "voidint").
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        let sv = semantify(&name)?;
        Ok(Self {
            name,
            sv,
            packages: Vec::new(),
        })
    }

    /// Attach the packages published for this release
    pub fn with_packages(mut self, packages: Vec<Package>) -> Self {
        self.packages = packages;
        self
    }

    /// Original release name, exactly as it appeared in the listing
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Ordering by semantic version precedence
    pub fn cmp_semver(&self, other: &Self) -> Ordering {
        self.sv.cmp(&other.sv)
    }

    /// Check if the version satisfies a constraint expression
    pub fn match_constraint(&self, constraint: &Constraint) -> bool {
        constraint.satisfies(&self.sv)
    }

    /// True when any package file name mentions both the OS and the
    /// architecture (substring containment, e.g. "darwin" and "arm64").
    pub fn matches_platform(&self, os: &str, arch: &str) -> bool {
        self.packages
            .iter()
            .any(|pkg| pkg.file_name.contains(os) && pkg.file_name.contains(arch))
    }

    /// Packages of the given kind built for exactly `os`/`arch`.
    ///
    /// Matches file names starting with `go<name>.<os>-<arch>.`, so `arm` does
    /// not pick up `arm64` builds.
    pub fn find_packages(
        &self,
        kind: PackageKind,
        os: &str,
        arch: &str,
    ) -> Result<Vec<&Package>, Error> {
        let prefixes: Vec<String> = package_arches(arch)
            .iter()
            .map(|arch| format!("go{}.{}-{}", self.name, os, arch))
            .collect();
        let exact_platform = |file_name: &str| {
            prefixes.iter().any(|prefix| {
                file_name
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
            })
        };

        let packages: Vec<&Package> = self
            .packages
            .iter()
            .filter(|pkg| pkg.kind == kind && exact_platform(&pkg.file_name))
            .collect();

        if packages.is_empty() {
            return Err(Error::package_not_found(kind.as_str(), os, arch));
        }
        Ok(packages)
    }
}

/// Architecture tokens a package file may carry for `arch`.
///
/// 32-bit ARM Linux builds are only published as `armv6l`.
fn package_arches(arch: &str) -> Vec<&str> {
    match arch {
        "arm" => vec!["arm", "armv6l"],
        other => vec![other],
    }
}
