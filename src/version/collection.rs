//! Ordered version lists

use std::ops::Deref;

use crate::version::types::Version;

/// Versions kept in ascending semantic version order.
///
/// Prerelease versions sort below the final release of the same numbers
/// (`1.21rc4` < `1.21.0`). Every producer hands its list over through this
/// type so consumers can rely on the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    items: Vec<Version>,
}

impl Collection {
    /// Sorts the versions and wraps them
    pub fn new(mut items: Vec<Version>) -> Self {
        sort_versions(&mut items);
        Self { items }
    }

    /// Highest version, if any
    pub fn latest(&self) -> Option<&Version> {
        self.items.last()
    }
}

impl Deref for Collection {
    type Target = [Version];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl From<Vec<Version>> for Collection {
    fn from(items: Vec<Version>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Version> for Collection {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Collection {
    type Item = Version;
    type IntoIter = std::vec::IntoIter<Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Sort versions ascending by semantic version precedence
pub fn sort_versions(items: &mut [Version]) {
    items.sort_by(|a, b| a.cmp_semver(b));
}
