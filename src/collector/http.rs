//! Fetching listing documents

use tracing::{debug, warn};

use crate::error::Error;

/// User-Agent string for all requests
pub const USER_AGENT: &str = concat!("g/", env!("CARGO_PKG_VERSION"));

/// Builds the client used for listing and checksum requests
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            warn!("Falling back to default HTTP client: {}", err);
            reqwest::Client::new()
        })
}

/// GET a document and return its body as text.
///
/// Transport failures map to `UrlUnreachable`, non-2xx responses to
/// `UnexpectedStatus` and unreadable bodies to `Download`.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<String, Error> {
    debug!("Fetching {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| Error::UrlUnreachable {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!("{} returned status {}", url, status);
        return Err(Error::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await.map_err(|source| {
        warn!("Failed to read response from {}: {}", url, source);
        Error::Download {
            url: url.to_string(),
            source,
        }
    })?;

    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}
