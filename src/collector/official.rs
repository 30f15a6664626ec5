//! Collector for the official download page (go.dev/dl and its mirrors)

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::collector::Collector;
use crate::collector::http::{default_client, fetch_document};
use crate::error::Error;
use crate::version::collection::sort_versions;
use crate::version::package::{Package, PackageKind};
use crate::version::types::Version;

/// Collector name used in `name|URL` mirror entries
pub const NAME: &str = "official";

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("thead th"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static STABLE: LazyLock<Selector> = LazyLock::new(|| selector("#stable"));
static UNSTABLE: LazyLock<Selector> = LazyLock::new(|| selector("#unstable"));
static ARCHIVED: LazyLock<Selector> = LazyLock::new(|| selector("#archive div.toggle"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must be valid")
}

/// A release block as it appears on the page, before its name is validated
#[derive(Debug, Clone)]
struct Release {
    name: String,
    packages: Vec<Package>,
}

/// Reads the structured release tables of the official download page.
///
/// The page is fetched and parsed once at construction; queries only turn the
/// extracted rows into versions.
#[derive(Debug, Clone)]
pub struct OfficialCollector {
    stable: Vec<Release>,
    unstable: Vec<Release>,
    archived: Vec<Release>,
}

impl OfficialCollector {
    /// Fetch and parse the download page at `download_page_url`
    pub async fn new(download_page_url: &str) -> Result<Self, Error> {
        Self::with_client(&default_client(), download_page_url).await
    }

    pub async fn with_client(
        client: &reqwest::Client,
        download_page_url: &str,
    ) -> Result<Self, Error> {
        if download_page_url.is_empty() {
            return Err(Error::EmptyUrl);
        }
        let base = Url::parse(download_page_url).map_err(|e| Error::InvalidUrl {
            url: download_page_url.to_string(),
            reason: e.to_string(),
        })?;

        let body = fetch_document(client, download_page_url).await?;
        Ok(Self::from_html(download_page_url, &base, &body))
    }

    fn from_html(url: &str, base: &Url, body: &str) -> Self {
        let doc = Html::parse_document(body);

        let stable = doc
            .select(&STABLE)
            .next()
            .map(|heading| releases_after(heading, &["unstable", "archive"], base))
            .unwrap_or_default();
        let unstable = doc
            .select(&UNSTABLE)
            .next()
            .map(|heading| releases_after(heading, &["archive"], base))
            .unwrap_or_default();
        let archived = doc
            .select(&ARCHIVED)
            .filter_map(|block| release(block, base))
            .collect::<Vec<_>>();

        debug!(
            "{} lists {} stable, {} unstable and {} archived releases",
            url,
            stable.len(),
            unstable.len(),
            archived.len()
        );

        Self {
            stable,
            unstable,
            archived,
        }
    }
}

/// Release blocks among the siblings following `heading`, up to the first
/// sibling whose id is one of `stop_ids`
fn releases_after(heading: ElementRef<'_>, stop_ids: &[&str], base: &Url) -> Vec<Release> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().id().is_none_or(|id| !stop_ids.contains(&id)))
        .filter_map(|el| release(el, base))
        .collect()
}

/// A sibling with an id is a release block; its first table lists the files
fn release(block: ElementRef<'_>, base: &Url) -> Option<Release> {
    let id = block.value().id()?;
    let name = id.strip_prefix("go").unwrap_or(id).to_string();
    let packages = block
        .select(&TABLE)
        .next()
        .map(|table| packages(table, base))
        .unwrap_or_default();
    Some(Release { name, packages })
}

fn packages(table: ElementRef<'_>, base: &Url) -> Vec<Package> {
    let algorithm = table
        .select(&HEADER_CELL)
        .last()
        .map(|th| text(th))
        .unwrap_or_default();
    let algorithm = algorithm
        .strip_suffix(" Checksum")
        .unwrap_or(&algorithm)
        .to_string();

    table
        .select(&ROW)
        .filter(|tr| !tr.value().classes().any(|class| class == "first"))
        .filter_map(|tr| {
            let cells: Vec<ElementRef<'_>> = tr.select(&CELL).collect();
            if cells.is_empty() {
                return None;
            }
            let cell = |i: usize| cells.get(i).map(|td| text(*td)).unwrap_or_default();
            let link = cells[0].select(&LINK).next();

            Some(Package {
                file_name: link.map(text).unwrap_or_default(),
                url: link
                    .and_then(|a| a.value().attr("href"))
                    .map(|href| absolute_url(base, href))
                    .unwrap_or_default(),
                kind: PackageKind::from_label(&cell(1)),
                os: cell(2),
                arch: cell(3),
                size: cell(4),
                checksum: cell(5),
                checksum_url: String::new(),
                algorithm: algorithm.clone(),
            })
        })
        .collect()
}

/// Site-relative links are resolved against the page's scheme and host
fn absolute_url(base: &Url, href: &str) -> String {
    if href.starts_with('/') {
        if let Ok(url) = base.join(href) {
            return url.to_string();
        }
    }
    href.to_string()
}

fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn to_versions(releases: &[Release]) -> Result<Vec<Version>, Error> {
    let mut versions = releases
        .iter()
        .map(|r| -> Result<Version, Error> {
            Ok(Version::new(r.name.as_str())?.with_packages(r.packages.clone()))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    sort_versions(&mut versions);
    Ok(versions)
}

impl Collector for OfficialCollector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stable_versions(&self) -> Result<Vec<Version>, Error> {
        to_versions(&self.stable)
    }

    fn unstable_versions(&self) -> Result<Vec<Version>, Error> {
        to_versions(&self.unstable)
    }

    fn archived_versions(&self) -> Result<Vec<Version>, Error> {
        to_versions(&self.archived)
    }

    fn all_versions(&self) -> Result<Vec<Version>, Error> {
        let mut versions = self.stable_versions()?;
        versions.extend(self.archived_versions()?);
        versions.extend(self.unstable_versions()?);
        sort_versions(&mut versions);
        Ok(versions)
    }
}
