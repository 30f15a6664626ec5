//! Versions installed on this machine

use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::version::collection::sort_versions;
use crate::version::types::Version;

/// One version per sub-directory of `dir` whose name is a Go release name,
/// sorted ascending. Plain files and other directories are skipped.
pub fn list_installed(dir: &Path) -> Result<Vec<Version>, Error> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        match Version::new(name) {
            Ok(version) => versions.push(version),
            Err(err) => debug!("Skipping {}: {}", path.display(), err),
        }
    }

    sort_versions(&mut versions);
    Ok(versions)
}

/// Name of the version the `goroot` symlink points at, if any
pub fn in_use(goroot: &Path) -> Option<String> {
    let target = std::fs::read_link(goroot).ok()?;
    target
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(versions: &[Version]) -> Vec<&str> {
        versions.iter().map(|v| v.name()).collect()
    }

    #[test]
    fn list_installed_returns_sorted_release_dirs() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["1.21.0", "1.7", "1.21rc4", "1.10beta2", "tmp"] {
            fs::create_dir(temp_dir.path().join(name)).unwrap();
        }
        fs::write(temp_dir.path().join("1.8.1"), "not a directory").unwrap();

        let versions = list_installed(temp_dir.path()).unwrap();
        assert_eq!(names(&versions), vec!["1.7", "1.10beta2", "1.21rc4", "1.21.0"]);
    }

    #[test]
    fn list_installed_on_empty_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_installed(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn list_installed_reports_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("versions");

        let err = list_installed(&missing).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == &missing));
    }

    #[cfg(unix)]
    #[test]
    fn in_use_follows_goroot_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("versions").join("1.21.4");
        fs::create_dir_all(&target).unwrap();
        let goroot = temp_dir.path().join("go");
        std::os::unix::fs::symlink(&target, &goroot).unwrap();

        assert_eq!(in_use(&goroot).as_deref(), Some("1.21.4"));
    }

    #[test]
    fn in_use_without_symlink_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(in_use(&temp_dir.path().join("go")), None);
    }
}
