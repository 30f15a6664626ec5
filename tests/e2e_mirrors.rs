//! Mirror listing E2E tests

mod helper;

use mockito::Server;

use gdist::Error;
use gdist::collector::http::default_client;
use gdist::collector::new_collector;
use gdist::version::remote::{RemoteFilter, list_remote};
use gdist::version::{Finder, PackageKind};

use helper::{AUTOINDEX_PAGE, FANCYINDEX_PAGE, mirror_entry, serve_page};

#[tokio::test]
async fn fancyindex_mirror_resolves_and_fetches_sidecar_checksum() {
    // 1. Serve the listing and one checksum sidecar
    let (mut server, listing) = serve_page("/golang/", FANCYINDEX_PAGE).await;
    let sidecar = server
        .mock("GET", "/golang/go1.21.4.darwin-arm64.tar.gz.sha256")
        .with_status(200)
        .with_body("8b7caf2ac60bdff457dba7d4ff2a01def889592b834453431ae3caecf884f6a5")
        .expect(1)
        .create_async()
        .await;

    // 2. Build the collector; the named entry wins over URL matching
    let collector = new_collector(&[mirror_entry("fancyindex", &server, "/golang/")])
        .await
        .unwrap();
    assert_eq!(collector.name(), "fancyindex");
    assert!(list_remote(collector.as_ref(), &RemoteFilter::Stable).unwrap().is_empty());

    // 3. Resolve and fetch the checksum lazily
    let finder = Finder::new(collector.all_versions().unwrap())
        .with_os("darwin")
        .with_arch("arm64");
    let version = finder.find("latest").unwrap();
    assert_eq!(version.name(), "1.21.4");

    let mut package = version
        .find_packages(PackageKind::Archive, "darwin", "arm64")
        .unwrap()[0]
        .clone();
    assert!(package.checksum.is_empty());
    assert!(package.has_checksum_source());

    let checksum = package.fetch_checksum(&default_client()).await.unwrap();
    assert_eq!(
        checksum,
        "8b7caf2ac60bdff457dba7d4ff2a01def889592b834453431ae3caecf884f6a5"
    );

    listing.assert_async().await;
    sidecar.assert_async().await;
}

#[tokio::test]
async fn autoindex_mirror_lists_versions() {
    let (server, listing) = serve_page("/golang/", AUTOINDEX_PAGE).await;

    let collector = new_collector(&[mirror_entry("autoindex", &server, "/golang")])
        .await
        .unwrap();
    assert_eq!(collector.name(), "autoindex");

    let versions = list_remote(collector.as_ref(), &RemoteFilter::All).unwrap();
    let names: Vec<&str> = versions.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["1.20.11", "1.21rc4", "1.21.4"]);

    let finder = Finder::new(versions.clone())
        .with_os("windows")
        .with_arch("amd64")
        .with_kind(PackageKind::Installer);
    let version = finder.find("1.21.4").unwrap();
    let installers = version
        .find_packages(PackageKind::Installer, "windows", "amd64")
        .unwrap();
    assert_eq!(installers[0].size, "65753088");

    // Platform exists for some release but not for 1.20.x
    assert!(matches!(
        finder.find("1.20.x"),
        Err(Error::PackageNotFound { ref kind, .. }) if kind == "Installer"
    ));

    listing.assert_async().await;
}

#[tokio::test]
async fn unusable_entries_are_skipped() {
    let (server, listing) = serve_page("/golang/", AUTOINDEX_PAGE).await;

    let collector = new_collector(&[
        "hello world".to_string(),
        mirror_entry("nginx", &server, "/golang/"),
        mirror_entry("autoindex", &server, "/golang/"),
    ])
    .await
    .unwrap();

    assert_eq!(collector.name(), "autoindex");
    listing.assert_async().await;
}

#[tokio::test]
async fn construction_failure_does_not_fall_back_to_next_entry() {
    let mut server = Server::new_async().await;
    let broken = server
        .mock("GET", "/dl/")
        .with_status(502)
        .expect(1)
        .create_async()
        .await;
    let fallback = server
        .mock("GET", "/golang/")
        .with_status(200)
        .with_body(FANCYINDEX_PAGE)
        .expect(0)
        .create_async()
        .await;

    let result = new_collector(&[
        mirror_entry("official", &server, "/dl/"),
        mirror_entry("fancyindex", &server, "/golang/"),
    ])
    .await;

    assert!(matches!(result, Err(ref err) if err.is_url_unreachable()));
    broken.assert_async().await;
    fallback.assert_async().await;
}
