//! Collector for mirrors served by the nginx fancyindex module

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

use crate::collector::Collector;
use crate::collector::file_item::{FileItem, convert_to_versions};
use crate::collector::http::{default_client, fetch_document};
use crate::error::Error;
use crate::version::types::Version;

/// Collector name used in `name|URL` mirror entries
pub const NAME: &str = "fancyindex";

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("td.link a"));
static SIZE: LazyLock<Selector> = LazyLock::new(|| selector("td.size"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must be valid")
}

/// Reads the file table of a fancyindex listing.
///
/// The listing carries no release channels, so only [`Collector::all_versions`]
/// returns anything.
#[derive(Debug, Clone)]
pub struct FancyIndexCollector {
    url: String,
    items: Vec<FileItem>,
}

impl FancyIndexCollector {
    /// Fetch and parse the listing at `download_page_url`
    pub async fn new(download_page_url: &str) -> Result<Self, Error> {
        Self::with_client(&default_client(), download_page_url).await
    }

    pub async fn with_client(
        client: &reqwest::Client,
        download_page_url: &str,
    ) -> Result<Self, Error> {
        let url = directory_url(download_page_url)?;
        let body = fetch_document(client, &url).await?;
        let items = parse_items(&url, &body);
        debug!("{} lists {} Go files", url, items.len());
        Ok(Self { url, items })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Validate a listing URL and make sure relative links can be appended to it
pub(crate) fn directory_url(download_page_url: &str) -> Result<String, Error> {
    if download_page_url.is_empty() {
        return Err(Error::EmptyUrl);
    }
    Url::parse(download_page_url).map_err(|e| Error::InvalidUrl {
        url: download_page_url.to_string(),
        reason: e.to_string(),
    })?;

    if download_page_url.ends_with('/') {
        Ok(download_page_url.to_string())
    } else {
        Ok(format!("{}/", download_page_url))
    }
}

fn parse_items(url: &str, body: &str) -> Vec<FileItem> {
    let doc = Html::parse_document(body);
    let Some(table) = doc.select(&TABLE).next() else {
        return Vec::new();
    };

    table
        .select(&ROW)
        .filter_map(|tr| {
            let anchor = tr.select(&LINK).next()?;
            let href = anchor.value().attr("href").unwrap_or_default();
            if !href.starts_with("go") || href.ends_with('/') {
                return None;
            }

            let size = tr
                .select(&SIZE)
                .next()
                .map(|td| td.text().collect::<String>())
                .unwrap_or_default();

            Some(FileItem::new(
                anchor.text().collect::<String>(),
                format!("{}{}", url, href),
                size.trim(),
            ))
        })
        .collect()
}

impl Collector for FancyIndexCollector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn stable_versions(&self) -> Result<Vec<Version>, Error> {
        Ok(Vec::new())
    }

    fn unstable_versions(&self) -> Result<Vec<Version>, Error> {
        Ok(Vec::new())
    }

    fn archived_versions(&self) -> Result<Vec<Version>, Error> {
        Ok(Vec::new())
    }

    fn all_versions(&self) -> Result<Vec<Version>, Error> {
        convert_to_versions(&self.items)
    }
}
