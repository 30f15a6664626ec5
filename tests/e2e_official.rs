//! Official download page E2E tests

mod helper;

use gdist::Error;
use gdist::collector::new_collector;
use gdist::version::remote::list_remote;
use gdist::version::{Finder, PackageKind};

use helper::{OFFICIAL_PAGE, mirror_entry, serve_page};

#[tokio::test]
async fn resolves_constraint_to_platform_package() {
    // 1. Serve the download page
    let (server, mock) = serve_page("/dl/", OFFICIAL_PAGE).await;

    // 2. Build the collector from a named mirror entry
    let collector = new_collector(&[mirror_entry("official", &server, "/dl/")])
        .await
        .unwrap();
    assert_eq!(collector.name(), "official");

    // 3. Resolve for darwin/arm64
    let finder = Finder::new(collector.all_versions().unwrap())
        .with_os("darwin")
        .with_arch("arm64");
    let version = finder.find("^1.20").unwrap();
    assert_eq!(version.name(), "1.21.4");

    // 4. Pick the archive for the platform
    let packages = version
        .find_packages(PackageKind::Archive, "darwin", "arm64")
        .unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].file_name, "go1.21.4.darwin-arm64.tar.gz");
    assert_eq!(
        packages[0].url,
        format!("{}/dl/go1.21.4.darwin-arm64.tar.gz", server.url())
    );
    assert_eq!(packages[0].algorithm, "SHA256");
    assert_eq!(
        packages[0].checksum,
        "8b7caf2ac60bdff457dba7d4ff2a01def889592b834453431ae3caecf884f6a5"
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn distinguishes_missing_version_from_missing_package() {
    let (server, _mock) = serve_page("/dl/", OFFICIAL_PAGE).await;
    let collector = new_collector(&[mirror_entry("official", &server, "/dl/")])
        .await
        .unwrap();

    let finder = Finder::new(collector.all_versions().unwrap())
        .with_os("darwin")
        .with_arch("arm64");

    // 1.19.13 exists but only ships for linux/amd64
    assert!(matches!(
        finder.find("~1.19"),
        Err(Error::PackageNotFound { .. })
    ));
    assert!(matches!(
        finder.find("1.11.111"),
        Err(Error::VersionNotFound { .. })
    ));
    assert_eq!(finder.find("latest").unwrap().name(), "1.22rc1");
    assert_eq!(finder.find("1.21.x").unwrap().name(), "1.21.4");
}

#[tokio::test]
async fn lists_remote_channels() {
    let (server, _mock) = serve_page("/dl/", OFFICIAL_PAGE).await;
    let collector = new_collector(&[mirror_entry("official", &server, "/dl/")])
        .await
        .unwrap();

    let names = |filter: &str| -> Vec<String> {
        list_remote(collector.as_ref(), &filter.parse().unwrap())
            .unwrap()
            .iter()
            .map(|v| v.name().to_string())
            .collect()
    };

    assert_eq!(names("stable"), vec!["1.20.11", "1.21.4"]);
    assert_eq!(names("unstable"), vec!["1.22rc1"]);
    assert_eq!(names("archived"), vec!["1.7", "1.10beta2", "1.19.13"]);
    assert_eq!(names("latest"), vec!["1.22rc1"]);
    assert_eq!(names(">=1.19 <1.21"), vec!["1.19.13", "1.20.11"]);
    assert_eq!(names("").len(), 6);
}
