//! Resolving a version expression against a version list for one platform

use tracing::debug;

use crate::config::{host_arch, host_os};
use crate::error::Error;
use crate::version::collection::Collection;
use crate::version::constraint::Constraint;
use crate::version::package::PackageKind;
use crate::version::types::Version;

/// Expression that selects the highest version available for the platform
pub const LATEST: &str = "latest";

/// Looks up versions for a target OS/arch.
///
/// Supported expressions:
/// 1. Specific version (e.g. `1.21.4`, `1.21rc4`)
/// 2. `latest`
/// 3. Wildcards (e.g. `1.21.x`, `1.x`, `1.18.*`)
/// 4. Caret ranges (e.g. `^1`, `^1.18`, `^1.18.10`)
/// 5. Tilde ranges (e.g. `~1.18`)
/// 6. Comparisons (e.g. `>1.18`, `<1.16`)
/// 7. Hyphen ranges (e.g. `1.18 - 1.20`)
#[derive(Debug, Clone)]
pub struct Finder {
    kind: PackageKind,
    os: String,
    arch: String,
    items: Collection,
}

impl Finder {
    /// Creates a Finder for the host platform looking for archives
    pub fn new(items: impl Into<Collection>) -> Self {
        Self {
            kind: PackageKind::Archive,
            os: host_os().to_string(),
            arch: host_arch().to_string(),
            items: items.into(),
        }
    }

    /// Package kind reported in `PackageNotFound` errors
    pub fn with_kind(mut self, kind: PackageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Target operating system in Go naming (e.g. darwin, freebsd, linux)
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Target architecture in Go naming (e.g. 386, amd64, arm, s390x)
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Returns the highest version matching the expression that has a package
    /// for the target platform.
    ///
    /// An exact name match always wins over constraint interpretation.
    /// `VersionNotFound` means nothing matched the expression (including an
    /// expression that is not a valid constraint); `PackageNotFound` means
    /// something matched but none of the matches ships for the platform.
    pub fn find(&self, expression: &str) -> Result<&Version, Error> {
        if expression == LATEST {
            return self.find_latest();
        }

        if let Some(version) = self
            .items
            .iter()
            .rev()
            .find(|v| v.name() == expression && v.matches_platform(&self.os, &self.arch))
        {
            return Ok(version);
        }

        let Some(constraint) = Constraint::parse(expression) else {
            debug!("{:?} is neither a known version nor a constraint", expression);
            return Err(self.version_not_found(expression));
        };

        let mut version_found = false;
        for version in self.items.iter().rev() {
            if !version.match_constraint(&constraint) {
                continue;
            }
            version_found = true;

            if version.matches_platform(&self.os, &self.arch) {
                return Ok(version);
            }
            debug!(
                "{} satisfies {:?} but has no {}/{} package",
                version.name(),
                expression,
                self.os,
                self.arch
            );
        }

        if version_found {
            return Err(self.package_not_found());
        }
        Err(self.version_not_found(expression))
    }

    /// Like [`Finder::find`], but panics when nothing is found
    pub fn must_find(&self, expression: &str) -> &Version {
        match self.find(expression) {
            Ok(version) => version,
            Err(err) => panic!("{}", err),
        }
    }

    fn find_latest(&self) -> Result<&Version, Error> {
        if self.items.is_empty() {
            return Err(self.version_not_found(LATEST));
        }

        self.items
            .iter()
            .rev()
            .find(|v| v.matches_platform(&self.os, &self.arch))
            .ok_or_else(|| self.package_not_found())
    }

    fn version_not_found(&self, expression: &str) -> Error {
        Error::version_not_found(expression, &self.os, &self.arch)
    }

    fn package_not_found(&self) -> Error {
        Error::package_not_found(self.kind.as_str(), &self.os, &self.arch)
    }
}
