//! Collectors read Go releases from download pages and mirror listings

pub mod autoindex;
pub mod fancyindex;
pub mod file_item;
pub mod http;
pub mod official;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

use crate::error::Error;
use crate::version::types::Version;

pub use autoindex::AutoIndexCollector;
pub use fancyindex::FancyIndexCollector;
pub use official::OfficialCollector;

/// Official download page
pub const OFFICIAL_DOWNLOAD_PAGE_URL: &str = "https://go.dev/dl/";
/// Official download page on its former domain
pub const ORIGINAL_OFFICIAL_DOWNLOAD_PAGE_URL: &str = "https://golang.org/dl/";
/// Official download page mirrored in China
pub const CN_DOWNLOAD_PAGE_URL: &str = "https://golang.google.cn/dl/";
/// Alibaba Cloud mirror (fancyindex)
pub const ALIYUN_DOWNLOAD_PAGE_URL: &str = "https://mirrors.aliyun.com/golang/";
/// Huazhong University of Science and Technology mirror (fancyindex)
pub const HUST_DOWNLOAD_PAGE_URL: &str = "https://mirrors.hust.edu.cn/golang/";
/// Nanjing University mirror (fancyindex)
pub const NJU_DOWNLOAD_PAGE_URL: &str = "https://mirrors.nju.edu.cn/golang/";
/// University of Science and Technology of China mirror (autoindex)
pub const USTC_DOWNLOAD_PAGE_URL: &str = "https://mirrors.ustc.edu.cn/golang/";

/// Source of Go release information
#[cfg_attr(test, automock)]
pub trait Collector: Send + Sync {
    /// Name of the page layout this collector reads
    fn name(&self) -> &'static str;

    /// Versions listed as stable, sorted ascending
    fn stable_versions(&self) -> Result<Vec<Version>, Error>;

    /// Release candidates and betas currently offered, sorted ascending
    fn unstable_versions(&self) -> Result<Vec<Version>, Error>;

    /// Versions no longer supported, sorted ascending
    fn archived_versions(&self) -> Result<Vec<Version>, Error>;

    /// Every version the source knows, sorted ascending
    fn all_versions(&self) -> Result<Vec<Version>, Error>;
}

/// Page layouts a collector can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorKind {
    Official,
    FancyIndex,
    AutoIndex,
}

impl CollectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorKind::Official => official::NAME,
            CollectorKind::FancyIndex => fancyindex::NAME,
            CollectorKind::AutoIndex => autoindex::NAME,
        }
    }

    /// Kind named by the prefix of a `name|URL` entry
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            official::NAME => Some(CollectorKind::Official),
            fancyindex::NAME => Some(CollectorKind::FancyIndex),
            autoindex::NAME => Some(CollectorKind::AutoIndex),
            _ => None,
        }
    }

    /// Kind of a well-known download page or mirror
    pub fn from_known_url(url: &str) -> Option<Self> {
        match url {
            OFFICIAL_DOWNLOAD_PAGE_URL
            | ORIGINAL_OFFICIAL_DOWNLOAD_PAGE_URL
            | CN_DOWNLOAD_PAGE_URL => Some(CollectorKind::Official),
            ALIYUN_DOWNLOAD_PAGE_URL | HUST_DOWNLOAD_PAGE_URL | NJU_DOWNLOAD_PAGE_URL => {
                Some(CollectorKind::FancyIndex)
            }
            USTC_DOWNLOAD_PAGE_URL => Some(CollectorKind::AutoIndex),
            _ => None,
        }
    }

    /// Build and load a collector of this kind
    pub async fn connect(self, url: &str) -> Result<Box<dyn Collector>, Error> {
        let collector: Box<dyn Collector> = match self {
            CollectorKind::Official => Box::new(OfficialCollector::new(url).await?),
            CollectorKind::FancyIndex => Box::new(FancyIndexCollector::new(url).await?),
            CollectorKind::AutoIndex => Box::new(AutoIndexCollector::new(url).await?),
        };
        Ok(collector)
    }
}

impl std::fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work out which collector a mirror entry asks for.
///
/// The entry is trimmed and given a trailing slash. A `name|URL` entry uses
/// the named layout; an unknown name makes the entry unusable even when its
/// URL is well known. A bare URL must be one of the well-known pages.
pub fn resolve(candidate: &str) -> Option<(CollectorKind, String)> {
    let mut candidate = candidate.trim().to_string();
    if !candidate.ends_with('/') {
        candidate.push('/');
    }

    if let Some(idx) = candidate.find('|')
        && idx > 0
        && idx < candidate.len() - 1
    {
        let name = candidate[..idx].trim();
        let url = candidate[idx + 1..].trim();
        return CollectorKind::from_name(name).map(|kind| (kind, url.to_string()));
    }

    CollectorKind::from_known_url(&candidate).map(|kind| (kind, candidate))
}

/// Build the collector for the first usable entry of `urls`.
///
/// No entries, or a single empty one, means the official download page.
/// Construction errors are returned right away instead of trying the next
/// entry; `CollectorNotFound` means no entry was usable.
pub async fn new_collector<S: AsRef<str>>(urls: &[S]) -> Result<Box<dyn Collector>, Error> {
    let defaults = [OFFICIAL_DOWNLOAD_PAGE_URL];
    let candidates: Vec<&str> = match urls {
        [] => defaults.to_vec(),
        [only] if only.as_ref().is_empty() => defaults.to_vec(),
        _ => urls.iter().map(|url| url.as_ref()).collect(),
    };

    for candidate in candidates {
        let Some((kind, url)) = resolve(candidate) else {
            debug!("Skipping mirror entry {:?}", candidate);
            continue;
        };
        info!("Using {} collector for {}", kind, url);
        return kind.connect(&url).await;
    }
    Err(Error::CollectorNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://go.dev/dl/", CollectorKind::Official, "https://go.dev/dl/")]
    #[case("https://golang.org/dl/", CollectorKind::Official, "https://golang.org/dl/")]
    #[case("https://golang.google.cn/dl/", CollectorKind::Official, "https://golang.google.cn/dl/")]
    #[case("https://mirrors.aliyun.com/golang", CollectorKind::FancyIndex, "https://mirrors.aliyun.com/golang/")]
    #[case("  https://mirrors.hust.edu.cn/golang/ ", CollectorKind::FancyIndex, "https://mirrors.hust.edu.cn/golang/")]
    #[case("https://mirrors.nju.edu.cn/golang/", CollectorKind::FancyIndex, "https://mirrors.nju.edu.cn/golang/")]
    #[case("https://mirrors.ustc.edu.cn/golang/", CollectorKind::AutoIndex, "https://mirrors.ustc.edu.cn/golang/")]
    #[case("official|https://golang.google.cn/dl/", CollectorKind::Official, "https://golang.google.cn/dl/")]
    #[case("fancyindex|https://mirrors.hust.edu.cn/golang/", CollectorKind::FancyIndex, "https://mirrors.hust.edu.cn/golang/")]
    #[case("autoindex | https://mirrors.example.org/golang", CollectorKind::AutoIndex, "https://mirrors.example.org/golang/")]
    #[case("fancyindex|https://mirrors.ustc.edu.cn/golang/", CollectorKind::FancyIndex, "https://mirrors.ustc.edu.cn/golang/")]
    fn resolve_returns_expected(
        #[case] candidate: &str,
        #[case] kind: CollectorKind,
        #[case] url: &str,
    ) {
        assert_eq!(resolve(candidate), Some((kind, url.to_string())));
    }

    #[rstest]
    #[case("hello world")]
    #[case("https://mirrors.example.org/golang/")]
    #[case("nginx|https://go.dev/dl/")]
    #[case("|https://go.dev/dl/")]
    fn resolve_rejects_unusable_entries(#[case] candidate: &str) {
        assert_eq!(resolve(candidate), None);
    }

    #[test]
    fn collector_kind_names_round_trip() {
        for kind in [
            CollectorKind::Official,
            CollectorKind::FancyIndex,
            CollectorKind::AutoIndex,
        ] {
            assert_eq!(CollectorKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(CollectorKind::from_name("Official"), None);
    }

    #[tokio::test]
    async fn new_collector_reports_collector_not_found() {
        let result = new_collector(&["hello world", "nginx|https://go.dev/dl/"]).await;
        assert!(matches!(result, Err(Error::CollectorNotFound)));
    }
}
