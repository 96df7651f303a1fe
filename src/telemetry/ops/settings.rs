use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Settings;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Load, Save }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Load => "load", Phase::Save => "save" } }
    fn span(&self) -> Span { match self { Phase::Load => info_span!("load"), Phase::Save => info_span!("save") } }
}

impl OpMarker for Settings {
    const NAME: &'static str = "settings";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("settings") }
}
