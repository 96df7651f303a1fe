use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Batch;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Resolve, Extract, Filter, Plan, Submit, Notify }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Resolve => "resolve",
        Phase::Extract => "extract",
        Phase::Filter => "filter",
        Phase::Plan => "plan",
        Phase::Submit => "submit",
        Phase::Notify => "notify",
    }}
    fn span(&self) -> Span { match self {
        Phase::Resolve => info_span!("resolve"),
        Phase::Extract => info_span!("extract"),
        Phase::Filter => info_span!("filter"),
        Phase::Plan => info_span!("plan"),
        Phase::Submit => info_span!("submit"),
        Phase::Notify => info_span!("notify"),
    }}
}

impl OpMarker for Batch {
    const NAME: &'static str = "batch";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("batch") }
}
