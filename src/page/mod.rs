use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use reqwest::Client;

use crate::config::AppConfig;
use crate::http;
use crate::telemetry::{self, ctx::LogCtx};
use crate::telemetry::ops::extract::{Extract as ExtractOp, Phase as ExtractPhase};

pub mod bvid;
pub mod extractor;
pub mod fetch;
pub mod poll;
pub mod types;

pub use fetch::PageSource;
pub use types::{Extraction, VideoRecord};

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug)]
pub enum PageError {
    /// The page has no `.video-card` elements at all.
    ContentNotFound,
    RecordIncomplete { index: usize },
    BvidExtractFailed { index: usize },
    LoadTimeout { attempts: u32 },
    Load(anyhow::Error),
}

impl PageError {
    /// Index of the card a per-card error refers to.
    pub fn card_index(&self) -> Option<usize> {
        match self {
            PageError::RecordIncomplete { index } | PageError::BvidExtractFailed { index } => Some(*index),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::ContentNotFound => write!(f, "no video cards found; is the weekly page fully loaded?"),
            PageError::RecordIncomplete { .. } => write!(f, "video card is missing link, title or uploader"),
            PageError::BvidExtractFailed { .. } => write!(f, "could not extract a BV id from the card link"),
            PageError::LoadTimeout { attempts } => write!(f, "page still had no video cards after {attempts} attempts"),
            PageError::Load(err) => write!(f, "failed to load page: {err:#}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageError::Load(err) => Some(&**err),
            _ => None,
        }
    }
}

/// Where the weekly page comes from, shared by `extract` and `batch`.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Saved HTML of the rendered weekly page
    #[arg(long, conflicts_with = "url")]
    pub html: Option<PathBuf>,
    /// Fetch the page over HTTP instead (defaults to the weekly page)
    #[arg(long)]
    pub url: Option<String>,
    /// Keep re-reading the page until video cards show up
    #[arg(long, default_value_t = false)]
    pub wait: bool,
    #[arg(long, default_value_t = poll::CHECK_INTERVAL.as_millis() as u64)]
    pub check_interval_ms: u64,
    #[arg(long, default_value_t = poll::MAX_RETRIES)]
    pub max_retries: u32,
}

impl SourceArgs {
    pub fn source(&self) -> PageSource {
        match (&self.html, &self.url) {
            (Some(path), _) => PageSource::File(path.clone()),
            (None, Some(url)) => PageSource::Url(url.clone()),
            (None, None) => PageSource::Url(extractor::WEEKLY_PAGE_URL.to_string()),
        }
    }
}

/// toview extract
#[derive(Args)]
pub struct ExtractCmd {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn run(cfg: &AppConfig, args: ExtractCmd) -> Result<()> {
    let log = telemetry::extract();
    let source = args.source.source();
    let _g = log.root_span_kv([
        ("source", source.to_string()),
        ("wait", args.source.wait.to_string()),
    ]).entered();

    let client = http::build_client(cfg.cookie.as_deref(), FETCH_TIMEOUT)?;
    let extraction = load_videos(&log, &client, &args.source).await?;

    log.info(format!("🎬 {} videos ({} cards skipped)", extraction.videos.len(), extraction.skipped.len()));
    for v in &extraction.videos {
        log.info(format!("  av{} {} [{}] — {}", v.aid, v.bvid, v.uploader, v.title));
    }
    if telemetry::config::json_mode() {
        let result = types::ExtractResult {
            candidates: extraction.candidates(),
            skipped: extraction.skipped.len(),
            videos: extraction.videos,
        };
        log.result(&result)?;
    }
    Ok(())
}

/// Load the page once (or poll with `--wait`) and log skipped cards.
pub async fn load_videos<O>(log: &LogCtx<O>, client: &Client, args: &SourceArgs) -> Result<Extraction>
where
    O: telemetry::ctx::OpMarker,
{
    let source = args.source();
    let extraction = if args.wait {
        let _s = telemetry::extract().span(&ExtractPhase::Poll).entered();
        poll::extract_when_ready(
            || fetch::load_page(client, &source),
            Duration::from_millis(args.check_interval_ms),
            args.max_retries,
        )
        .await?
    } else {
        let html = {
            let _s = telemetry::extract().span(&ExtractPhase::Load).entered();
            fetch::load_page(client, &source).await?
        };
        let _s = telemetry::extract().span(&ExtractPhase::Parse).entered();
        extractor::extract_videos(&html)?
    };

    let extract_log: LogCtx<ExtractOp> = telemetry::extract();
    for skip in &extraction.skipped {
        extract_log.card_skipped(skip.card_index().unwrap_or(0), &skip.to_string());
    }
    if extraction.skipped.len() == extraction.candidates() {
        log.warn("every video card was skipped; the page layout may have changed");
    }
    Ok(extraction)
}
