use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::extractor::extract_videos;
use super::types::Extraction;
use super::PageError;

pub const CHECK_INTERVAL: Duration = Duration::from_millis(1000);
pub const MAX_RETRIES: u32 = 10;

/// Load and extract until the page shows video cards.
///
/// Only `ContentNotFound` is retried; any load error or other failure is
/// returned at once. After `max_retries` attempts (at least one) without
/// cards the result is `PageError::LoadTimeout`.
pub async fn extract_when_ready<F, Fut>(mut load: F, interval: Duration, max_retries: u32) -> Result<Extraction, PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    let attempts = max_retries.max(1);
    for attempt in 1..=attempts {
        let html = load().await.map_err(PageError::Load)?;
        match extract_videos(&html) {
            Err(PageError::ContentNotFound) => {
                debug!(attempt, attempts, "no video cards yet");
                if attempt < attempts {
                    tokio::time::sleep(interval).await;
                }
            }
            other => return other,
        }
    }
    Err(PageError::LoadTimeout { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const READY: &str = r#"<div class="video-card"><a href="/video/BV17x411w7KC"></a><p class="video-name">t</p><span class="up-name__text">u</span></div>"#;
    const EMPTY: &str = "<div id=\"app\"></div>";

    #[tokio::test(start_paused = true)]
    async fn retries_until_cards_appear() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let start = tokio::time::Instant::now();
        let got = extract_when_ready(
            move || {
                let n = c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(if n < 2 { EMPTY.to_string() } else { READY.to_string() }) }
            },
            CHECK_INTERVAL,
            MAX_RETRIES,
        )
        .await
        .unwrap();
        assert_eq!(got.videos.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= CHECK_INTERVAL * 2 && elapsed < CHECK_INTERVAL * 3, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let got = extract_when_ready(
            move || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Ok(EMPTY.to_string()) }
            },
            CHECK_INTERVAL,
            3,
        )
        .await;
        assert!(matches!(got, Err(PageError::LoadTimeout { attempts: 3 })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn load_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let got = extract_when_ready(
            move || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(anyhow::anyhow!("connection refused")) }
            },
            CHECK_INTERVAL,
            MAX_RETRIES,
        )
        .await;
        assert!(matches!(got, Err(PageError::Load(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
