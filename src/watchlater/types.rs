use serde::Serialize;

use crate::page::VideoRecord;

use super::batch::BatchOutcome;
use super::notify::Notice;

#[derive(Serialize)]
pub struct BatchPlan {
    pub candidates: usize,
    pub skipped_cards: usize,
    pub blacklisted: usize,
    pub to_add: usize,
    pub delay_ms: u64,
    pub sample: Vec<VideoRecord>,
}

#[derive(Serialize)]
pub struct BatchApply {
    pub outcome: BatchOutcome,
    pub blacklisted: usize,
    pub skipped_cards: usize,
    pub token_source: &'static str,
    pub notice: Notice,
}

#[derive(Serialize)]
pub struct AddResult {
    pub aid: u64,
    pub added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
