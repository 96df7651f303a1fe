use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER, USER_AGENT};
use reqwest::Client;

const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const REFERER_URL: &str = "https://www.bilibili.com";

/// Shared client for page fetches and API calls. The cookie string, when
/// present, rides along on every request.
pub fn build_client(cookie: Option<&str>, timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
    if let Some(c) = cookie.map(str::trim).filter(|c| !c.is_empty()) {
        let value = HeaderValue::from_str(c).context("cookie contains characters not allowed in a header")?;
        headers.insert(COOKIE, value);
    }
    let client = Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
