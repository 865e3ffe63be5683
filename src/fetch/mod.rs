mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Downloads `url` and returns the body, failing on non-success statuses.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid URL {url}"))?,
    );

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} failed with status {status}");
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Download complete");
    Ok(bytes)
}

/// Reads a source that is either an `http(s)` URL or a local file path.
#[tracing::instrument]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))
    }
}
