use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod blacklist;
mod config;
mod http;
mod output;
mod page;
mod settings;
mod telemetry;
mod watchlater;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "toview", about = "Add the Bilibili weekly picks to your watch-later list")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,
    /// Settings file (token + uploader blacklist)
    #[arg(global = true, long, env = "TOVIEW_SETTINGS")]
    settings: Option<PathBuf>,
    /// Cookie header sent with every request (needs SESSDATA and bili_jct)
    #[arg(global = true, long, env = "BILI_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the videos on the weekly page
    Extract(page::ExtractCmd),
    /// Add every non-blacklisted video from the weekly page
    Batch(watchlater::BatchCmd),
    /// Add a single video
    Add(watchlater::AddCmd),
    /// Show or edit stored settings
    Settings(settings::SettingsCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and TOVIEW_LOG_FORMAT
    telemetry::config::init_tracing();
    let cfg = AppConfig::new(cli.settings, cli.cookie);

    match cli.command {
        Commands::Extract(args) => page::run(&cfg, args).await?,
        Commands::Batch(args) => watchlater::run_batch(&cfg, args).await?,
        Commands::Add(args) => watchlater::run_add(&cfg, args).await?,
        Commands::Settings(args) => settings::run(&cfg, args)?,
    }

    Ok(())
}
