use serde::Serialize;

use super::batch::BatchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    AllSuccess,
    Partial,
    AllFailed,
    Empty,
}

/// End-of-batch summary shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        let (kind, title, message) = match (outcome.success, outcome.failed) {
            (0, 0) => (NoticeKind::Empty, "Nothing to add", "No videos left after filtering".to_string()),
            (ok, 0) => (NoticeKind::AllSuccess, "Added", format!("Added {ok} videos to watch later")),
            (0, _) => (NoticeKind::AllFailed, "Add failed", "Add failed, check that the CSRF token is correct".to_string()),
            (ok, failed) => (NoticeKind::Partial, "Added", format!("Added {ok} videos, {failed} failed")),
        };
        Notice { kind, title: title.to_string(), message }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.kind, NoticeKind::AllFailed | NoticeKind::Partial)
    }
}
