//! Error taxonomy shared by collectors, the version model and the finder

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A version name could not be coerced into a semantic version
    #[error("malformed version string {version:?}")]
    MalformedVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// The requested expression matched no version at all
    #[error("version not found {version:?} [{os},{arch}]")]
    VersionNotFound {
        version: String,
        os: String,
        arch: String,
    },

    /// At least one version matched, but none ships a package for the platform
    #[error("package not found [{os},{arch},{kind}]")]
    PackageNotFound {
        kind: String,
        os: String,
        arch: String,
    },

    #[error("collector not found")]
    CollectorNotFound,

    #[error("empty url")]
    EmptyUrl,

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure while requesting a listing or checksum
    #[error("URL {url:?} is unreachable ==> {source}")]
    UrlUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("URL {url:?} is unreachable ==> {status}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response arrived but its body could not be read
    #[error("resource({url}) download failed ==> {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid version constraint {expression:?}")]
    InvalidConstraint { expression: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new VersionNotFound error
    pub fn version_not_found(
        version: impl Into<String>,
        os: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Error::VersionNotFound {
            version: version.into(),
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Creates a new PackageNotFound error
    pub fn package_not_found(
        kind: impl Into<String>,
        os: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Error::PackageNotFound {
            kind: kind.into(),
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Creates a new Io error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for every failure to reach a remote document, whatever the cause
    pub fn is_url_unreachable(&self) -> bool {
        matches!(
            self,
            Error::UrlUnreachable { .. } | Error::UnexpectedStatus { .. }
        )
    }
}
