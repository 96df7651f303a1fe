use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Client;

#[derive(Debug, Clone)]
pub enum PageSource {
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for PageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSource::File(p) => write!(f, "{}", p.display()),
            PageSource::Url(u) => write!(f, "{}", u),
        }
    }
}

pub async fn load_page(client: &Client, source: &PageSource) -> Result<String> {
    match source {
        PageSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading page html from {}", path.display())),
        PageSource::Url(url) => fetch_page(client, url).await,
    }
}

async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let text = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetching {}", url))?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}
