use semver::Version;

use crate::error::Error;

/// Prerelease markers Go writes directly after the numeric part, in lookup order
const PRERELEASE_TAGS: [&str; 3] = ["alpha", "beta", "rc"];

/// Coerce a Go release name into a strict semantic version.
///
/// Go release names are not semver: prerelease tags are glued to the number
/// and trailing zero components are omitted.
///
/// Examples:
/// - "1.21rc4" -> Version(1, 21, 0, pre: "rc4")
/// - "1.10beta2" -> Version(1, 10, 0, pre: "beta2")
/// - "1.7" -> Version(1, 7, 0)
/// - "1.21.4" -> Version(1, 21, 4)
pub fn semantify(name: &str) -> Result<Version, Error> {
    let hyphenated = insert_prerelease_separator(name);
    let normalized = pad_version_core(&hyphenated);

    Version::parse(&normalized).map_err(|source| Error::MalformedVersion {
        version: name.to_string(),
        source,
    })
}

/// Insert a `-` in front of the first `alpha`, `beta` or `rc` marker.
///
/// Does nothing when the marker is at the start or already separated.
pub(crate) fn insert_prerelease_separator(name: &str) -> String {
    let Some(idx) = PRERELEASE_TAGS.iter().find_map(|tag| name.find(tag)) else {
        return name.to_string();
    };

    if idx == 0 || name[..idx].ends_with('-') {
        return name.to_string();
    }

    format!("{}-{}", &name[..idx], &name[idx..])
}

/// Pad a partial version core with zeros, keeping any prerelease or build suffix.
///
/// Examples:
/// - "1" -> "1.0.0"
/// - "1.2" -> "1.2.0"
/// - "1.21-rc4" -> "1.21.0-rc4"
fn pad_version_core(version: &str) -> String {
    let version = version.strip_prefix('v').unwrap_or(version);
    let split = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(split);

    match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => version.to_string(),
    }
}
