//! Downloadable artifacts attached to a release

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Label of the checksum algorithm used by `.sha256` sidecar files
pub const SHA256: &str = "SHA256";

/// Package format category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    /// Source code tarball
    Source,
    /// Compressed binary archive (.tar.gz, .zip)
    Archive,
    /// Platform installer (.pkg, .msi)
    Installer,
    /// Anything the listing labelled with an unrecognized kind
    Unknown,
}

impl PackageKind {
    /// Returns the display label of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Source => "Source",
            PackageKind::Archive => "Archive",
            PackageKind::Installer => "Installer",
            PackageKind::Unknown => "Unknown",
        }
    }

    /// Parse a kind label, falling back to `Unknown` instead of failing
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(PackageKind::Unknown)
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(PackageKind::Source),
            "archive" => Ok(PackageKind::Archive),
            "installer" => Ok(PackageKind::Installer),
            "unknown" => Ok(PackageKind::Unknown),
            _ => Err(()),
        }
    }
}

/// One downloadable file for one version/OS/arch/kind combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "filename")]
    pub file_name: String,
    pub url: String,
    pub kind: PackageKind,
    pub os: String,
    pub arch: String,
    /// Human-readable size as shown by the listing (e.g. "63MB")
    pub size: String,
    /// May be empty until fetched from `checksum_url`
    pub checksum: String,
    #[serde(skip)]
    pub checksum_url: String,
    pub algorithm: String,
}

impl Package {
    /// True when the package can be verified, either from an inline checksum
    /// or from a sidecar file
    pub fn has_checksum_source(&self) -> bool {
        !self.checksum.is_empty() || !self.checksum_url.is_empty()
    }

    /// Fill in the checksum from `checksum_url` if it is not known yet.
    ///
    /// Returns the checksum, which stays empty when the listing offered neither
    /// an inline value nor a sidecar.
    pub async fn fetch_checksum(&mut self, client: &reqwest::Client) -> Result<&str, Error> {
        if self.checksum.is_empty() && !self.checksum_url.is_empty() {
            debug!("Fetching checksum for {} from {}", self.file_name, self.checksum_url);

            let response = client
                .get(&self.checksum_url)
                .send()
                .await
                .map_err(|source| Error::Download {
                    url: self.checksum_url.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::UnexpectedStatus {
                    url: self.checksum_url.clone(),
                    status,
                });
            }

            let body = response.text().await.map_err(|source| Error::Download {
                url: self.checksum_url.clone(),
                source,
            })?;

            // Sidecars may carry "<hash>  <filename>"
            self.checksum = body.split_whitespace().next().unwrap_or_default().to_string();
        }
        Ok(&self.checksum)
    }
}
