use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Add;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Resolve, Submit }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Resolve => "resolve", Phase::Submit => "submit" } }
    fn span(&self) -> Span { match self { Phase::Resolve => info_span!("resolve"), Phase::Submit => info_span!("submit") } }
}

impl OpMarker for Add {
    const NAME: &'static str = "add";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("add") }
}
