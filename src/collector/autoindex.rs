//! Collector for mirrors served by the stock nginx autoindex module

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::collector::Collector;
use crate::collector::fancyindex::directory_url;
use crate::collector::file_item::{FileItem, convert_to_versions};
use crate::collector::http::{default_client, fetch_document};
use crate::error::Error;
use crate::version::types::Version;

/// Collector name used in `name|URL` mirror entries
pub const NAME: &str = "autoindex";

static LISTING: LazyLock<Selector> = LazyLock::new(|| selector("pre"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("table tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Text following a `<pre>` link: "08-Nov-2023 18:05    66615271"
static ROW_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\S+\s+\S+\s+(\S+)\s*$").expect("static regex must be valid")
});

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must be valid")
}

/// Reads a plain autoindex listing.
///
/// Stock nginx renders the listing as `<pre>` lines; some mirrors restyle it
/// as a table with the link in the first cell and the size in the second.
/// Both layouts are accepted. Like fancyindex, there are no release channels.
#[derive(Debug, Clone)]
pub struct AutoIndexCollector {
    url: String,
    items: Vec<FileItem>,
}

impl AutoIndexCollector {
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

fn parse_items(url: &str, body: &str) -> Vec<FileItem> {
    let doc = Html::parse_document(body);

    match doc.select(&LISTING).next() {
        Some(pre) => pre
            .select(&LINK)
            .filter_map(|anchor| {
                let size = anchor
                    .next_sibling()
                    .and_then(|node| node.value().as_text().map(|t| row_size(t)))
                    .unwrap_or_default();
                file_item(url, anchor, size)
            })
            .collect(),
        None => doc
            .select(&ROW)
            .filter_map(|tr| {
                let cells: Vec<ElementRef<'_>> = tr.select(&CELL).collect();
                let anchor = cells.first()?.select(&LINK).next()?;
                let size = cells
                    .get(1)
                    .map(|td| td.text().collect::<String>().trim().to_string())
                    .unwrap_or_default();
                file_item(url, anchor, size)
            })
            .collect(),
    }
}

/// Size column of a `<pre>` line, the last of its three fields
fn row_size(tail: &str) -> String {
    ROW_TAIL
        .captures(tail)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// The link target is used as the file name because autoindex truncates long
/// link texts ("go1.21.4.linux-amd64.tar.gz.sha2..&gt;").
fn file_item(url: &str, anchor: ElementRef<'_>, size: String) -> Option<FileItem> {
    let href = anchor.value().attr("href")?;
    if !href.starts_with("go") || href.ends_with('/') {
        return None;
    }
    Some(FileItem::new(href, format!("{}{}", url, href), size))
}

impl Collector for AutoIndexCollector {
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
