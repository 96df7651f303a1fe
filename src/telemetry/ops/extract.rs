use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Extract;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Load, Parse, Poll }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Load => "load", Phase::Parse => "parse", Phase::Poll => "poll" } }
    fn span(&self) -> Span { match self { Phase::Load => info_span!("load"), Phase::Parse => info_span!("parse"), Phase::Poll => info_span!("poll") } }
}

impl OpMarker for Extract {
    const NAME: &'static str = "extract";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("extract") }
}
