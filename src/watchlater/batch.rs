use std::time::Duration;

use serde::Serialize;

use crate::page::VideoRecord;
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::batch::Batch as BatchOp;

use super::client::WatchLaterApi;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub success: usize,
    pub failed: usize,
}

/// Add every record, one request at a time, sleeping `delay` between
/// consecutive requests whatever the previous result was.
///
/// A failed request (transport, non-zero code, bad body) only counts against
/// that record. Nothing is retried and the loop cannot be cancelled once
/// started.
pub async fn submit_batch<A>(
    api: &A,
    videos: &[VideoRecord],
    csrf: &str,
    delay: Duration,
    log: Option<&LogCtx<BatchOp>>,
) -> BatchOutcome
where
    A: WatchLaterApi + ?Sized,
{
    let mut outcome = BatchOutcome::default();
    for (i, video) in videos.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        match api.add(video.aid, csrf).await {
            Ok(()) => {
                outcome.success += 1;
                if let Some(ctx) = log { ctx.added(video.aid, &video.title); }
            }
            Err(err) => {
                outcome.failed += 1;
                if let Some(ctx) = log { ctx.add_failed(video.aid, &video.title, &err); }
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watchlater::client::mock::MockApi;
    use crate::watchlater::client::ToviewError;

    fn video(aid: u64) -> VideoRecord {
        VideoRecord {
            title: format!("video {aid}"),
            link: format!("https://www.bilibili.com/video/av{aid}"),
            uploader: "someone".into(),
            bvid: String::new(),
            aid,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tallies_and_paces_requests() {
        let api = MockApi::new();
        api.push_response(Ok(()));
        api.push_response(Err(ToviewError::Api { code: -400, message: "bad".into() }));
        api.push_response(Ok(()));

        let videos = vec![video(11), video(22), video(33)];
        let start = tokio::time::Instant::now();
        let outcome = submit_batch(&api, &videos, "tok", DEFAULT_DELAY, None).await;

        assert_eq!(outcome, BatchOutcome { success: 2, failed: 1 });
        // exactly two pauses between three calls
        let elapsed = start.elapsed();
        assert!(elapsed >= DEFAULT_DELAY * 2 && elapsed < DEFAULT_DELAY * 3, "elapsed {elapsed:?}");

        let calls = api.calls();
        let aids: Vec<u64> = calls.iter().map(|c| c.0).collect();
        assert_eq!(aids, vec![11, 22, 33]);
        assert!(calls.iter().all(|c| c.1 == "tok"));
        for pair in calls.windows(2) {
            let gap = pair[1].2 - pair[0].2;
            assert!(gap >= DEFAULT_DELAY && gap < DEFAULT_DELAY * 2, "gap {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_skip_the_delay() {
        let api = MockApi::new();
        api.push_response(Err(ToviewError::Timeout));
        api.push_response(Ok(()));

        let delay = Duration::from_millis(50);
        let outcome = submit_batch(&api, &[video(1), video(2)], "tok", delay, None).await;
        assert_eq!(outcome, BatchOutcome { success: 1, failed: 1 });
        let calls = api.calls();
        let gap = calls[1].2 - calls[0].2;
        assert!(gap >= delay && gap < delay * 2, "gap {gap:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn single_and_empty_batches_never_sleep() {
        let api = MockApi::new();
        api.push_response(Ok(()));
        let start = tokio::time::Instant::now();
        let outcome = submit_batch(&api, &[video(7)], "tok", DEFAULT_DELAY, None).await;
        assert_eq!(outcome, BatchOutcome { success: 1, failed: 0 });

        let outcome = submit_batch(&api, &[], "tok", DEFAULT_DELAY, None).await;
        assert_eq!(outcome, BatchOutcome::default());
        assert!(start.elapsed() < DEFAULT_DELAY);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn exhausted_mock_counts_as_failure() {
        let api = MockApi::new();
        let outcome = submit_batch(&api, &[video(1)], "tok", Duration::ZERO, None).await;
        assert_eq!(outcome.failed, 1);
    }
}
