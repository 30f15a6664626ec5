//! Mock download pages

use mockito::{Mock, Server, ServerGuard};

/// Trimmed copy of the official download page
pub const OFFICIAL_PAGE: &str = include_str!("../fixtures/official.html");

/// Listing rendered by the nginx fancyindex module
pub const FANCYINDEX_PAGE: &str = include_str!("../fixtures/fancyindex.html");

/// Listing rendered by the stock nginx autoindex module
pub const AUTOINDEX_PAGE: &str = include_str!("../fixtures/autoindex.html");

/// Start a server answering `GET path` with `body` exactly once
pub async fn serve_page(path: &str, body: &str) -> (ServerGuard, Mock) {
    let mut server = Server::new_async().await;
    let mock = mock_page(&mut server, path, body).await;
    (server, mock)
}

/// Register `GET path` on an existing server, expected exactly once
pub async fn mock_page(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

/// `name|URL` mirror entry pointing at `path` on the mock server
pub fn mirror_entry(name: &str, server: &ServerGuard, path: &str) -> String {
    format!("{}|{}{}", name, server.url(), path)
}
