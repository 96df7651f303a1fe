pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn extract() -> LogCtx<ops::extract::Extract> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn batch() -> LogCtx<ops::batch::Batch> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn add() -> LogCtx<ops::add::Add> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn settings() -> LogCtx<ops::settings::Settings> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
