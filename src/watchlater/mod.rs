use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;

use crate::blacklist::filter_blacklisted;
use crate::config::{self, AppConfig, TokenSource};
use crate::http;
use crate::output::types::Meta;
use crate::page::{self, SourceArgs};
use crate::settings::{store, Settings};
use crate::telemetry::{self};
use crate::telemetry::ops::add::Phase as AddPhase;
use crate::telemetry::ops::batch::Phase as BatchPhase;

pub mod batch;
pub mod client;
pub mod notify;
mod types;

use client::{BiliClient, WatchLaterApi};
use notify::Notice;

const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Token and endpoint options shared by `batch` and `add`.
#[derive(Args, Clone, Debug)]
pub struct SubmitArgs {
    /// CSRF token (`bili_jct`); overrides cookie and stored settings
    #[arg(long, env = "BILI_JCT", hide_env_values = true)]
    pub csrf: Option<String>,
    #[arg(long, env = "TOVIEW_API_BASE", default_value = client::DEFAULT_API_BASE)]
    pub api_base: String,
}

/// toview batch — extract, filter, then (with --apply) add everything
#[derive(Args)]
pub struct BatchCmd {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub submit: SubmitArgs,
    /// Pause between two add requests
    #[arg(long, default_value_t = batch::DEFAULT_DELAY.as_millis() as u64)]
    pub delay_ms: u64,
    /// Ignore the stored uploader blacklist for this run
    #[arg(long, default_value_t = false)]
    pub no_blacklist: bool,
    #[arg(long, default_value_t = false)]
    pub apply: bool,
    #[arg(long, default_value_t = 10)]
    pub plan_limit: usize,
}

/// toview add <BVID|avID>
#[derive(Args)]
pub struct AddCmd {
    /// `BV1…`, `av123` or a bare aid
    pub id: String,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

pub async fn run_batch(cfg: &AppConfig, args: BatchCmd) -> Result<()> {
    let log = telemetry::batch();
    let source = args.source.source();
    let _g = log.root_span_kv([
        ("apply", args.apply.to_string()),
        ("source", source.to_string()),
        ("delay_ms", args.delay_ms.to_string()),
        ("no_blacklist", args.no_blacklist.to_string()),
    ]).entered();
    let t0 = Instant::now();

    let mut settings = { let _s = log.span(&BatchPhase::Resolve).entered(); store::load(&cfg.settings_path)? };

    let page_client = http::build_client(cfg.cookie.as_deref(), API_TIMEOUT * 2)?;
    let extraction = {
        let _s = log.span(&BatchPhase::Extract).entered();
        page::load_videos(&log, &page_client, &args.source).await?
    };
    let candidates = extraction.candidates();
    let skipped_cards = extraction.skipped.len();

    let (videos, dropped) = {
        let active = active_blacklist(&settings, args.no_blacklist);
        let _s = log.span_kv(&BatchPhase::Filter, [
            ("blacklist", active.len().to_string()),
            ("no_blacklist", args.no_blacklist.to_string()),
        ]).entered();
        filter_blacklisted(extraction.videos, active)
    };
    for v in &dropped {
        log.info_kv(&format!("🚫 blacklisted [{}] {}", v.uploader, v.title), [("uploader", v.uploader.clone()), ("aid", v.aid.to_string())]);
    }

    if !args.apply {
        let _s = log.span(&BatchPhase::Plan).entered();
        if telemetry::config::json_mode() {
            let plan = types::BatchPlan {
                candidates,
                skipped_cards,
                blacklisted: dropped.len(),
                to_add: videos.len(),
                delay_ms: args.delay_ms,
                sample: videos.iter().take(args.plan_limit).cloned().collect(),
            };
            log.plan(&plan)?;
        } else {
            log.info(format!("📝 Batch plan — to_add={} blacklisted={} skipped_cards={}", videos.len(), dropped.len(), skipped_cards));
            for v in videos.iter().take(args.plan_limit) { log.info(format!("  av{} [{}] {}", v.aid, v.uploader, v.title)); }
            if videos.len() > args.plan_limit { log.info(format!("  ... ({} more)", videos.len() - args.plan_limit)); }
            log.info("   Use --apply to execute.");
        }
        return Ok(());
    }

    let (csrf, token_source) = {
        let _s = log.span(&BatchPhase::Resolve).entered();
        resolve_and_sync_token(cfg, &args.submit, &mut settings)?
    };

    let api = BiliClient::new(http::build_client(cfg.cookie.as_deref(), API_TIMEOUT)?, args.submit.api_base.clone());
    let outcome = {
        let _s = log.span_kv(&BatchPhase::Submit, [("videos", videos.len().to_string())]).entered();
        batch::submit_batch(&api, &videos, &csrf, Duration::from_millis(args.delay_ms), Some(&log)).await
    };

    log.totals(outcome.success, outcome.failed, dropped.len());
    let notice = {
        let _s = log.span(&BatchPhase::Notify).entered();
        let notice = Notice::from_outcome(&outcome);
        if notice.is_failure() { log.warn(format!("🔔 {}: {}", notice.title, notice.message)); }
        else { log.info(format!("🔔 {}: {}", notice.title, notice.message)); }
        notice
    };

    if telemetry::config::json_mode() {
        let result = types::BatchApply {
            outcome,
            blacklisted: dropped.len(),
            skipped_cards,
            token_source: token_source.as_str(),
            notice,
        };
        log.result_meta(&result, Meta { duration_ms: Some(t0.elapsed().as_millis()), run_id: None })?;
    }
    Ok(())
}

pub async fn run_add(cfg: &AppConfig, args: AddCmd) -> Result<()> {
    let log = telemetry::add();
    let _g = log.root_span_kv([("id", args.id.clone())]).entered();

    let Some(aid) = page::bvid::parse_video_id(&args.id) else {
        bail!("Not a video id: {} (expected BV1…, av123 or a number)", args.id);
    };

    let (csrf, _) = {
        let _s = log.span(&AddPhase::Resolve).entered();
        let mut settings = store::load(&cfg.settings_path)?;
        resolve_and_sync_token(cfg, &args.submit, &mut settings)?
    };

    let api = BiliClient::new(http::build_client(cfg.cookie.as_deref(), API_TIMEOUT)?, args.submit.api_base.clone());
    let res = { let _s = log.span(&AddPhase::Submit).entered(); api.add(aid, &csrf).await };

    let result = match res {
        Ok(()) => { log.info(format!("➕ av{} added to watch later", aid)); types::AddResult { aid, added: true, error: None } }
        Err(err) => { log.error(format!("❌ av{} not added: {}", aid, err)); types::AddResult { aid, added: false, error: Some(err.to_string()) } }
    };
    if telemetry::config::json_mode() {
        log.result(&result)?;
    }
    if !result.added {
        bail!("Adding av{} failed", aid);
    }
    Ok(())
}

/// The blacklist this run filters with; empty under `--no-blacklist`.
fn active_blacklist(settings: &Settings, skip: bool) -> &[String] {
    if skip { &[] } else { &settings.up_blacklist }
}

/// Resolve the CSRF token and, when it came from the cookie, remember it in
/// settings so later runs without a cookie still have it.
fn resolve_and_sync_token(cfg: &AppConfig, submit: &SubmitArgs, settings: &mut Settings) -> Result<(String, TokenSource)> {
    let (token, source) = config::resolve_token(submit.csrf.as_deref(), cfg.cookie.as_deref(), settings)?;
    if source == TokenSource::Cookie && settings.bili_jct.as_deref() != Some(token.as_str()) {
        settings.set_token(&token);
        // a failed save never blocks the add
        match store::save(&cfg.settings_path, settings) {
            Ok(()) => tracing::info!("saved bili_jct from cookie to settings"),
            Err(err) => tracing::warn!(error = %format!("{err:#}"), "could not save bili_jct to settings"),
        }
    }
    Ok((token, source))
}
