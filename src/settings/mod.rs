use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::blacklist::parse_blacklist;
use crate::config::AppConfig;
use crate::telemetry::{self};
use crate::telemetry::ops::settings::Phase as SettingsPhase;

pub mod store;

pub use store::Settings;

/// toview settings show/set-token/blacklist
#[derive(Args)]
pub struct SettingsCmd {
    #[command(subcommand)]
    pub cmd: SettingsSub,
}

#[derive(Subcommand)]
pub enum SettingsSub {
    /// Print the stored token (masked) and blacklist
    Show,
    /// Store the CSRF token (the `bili_jct` cookie value)
    SetToken { token: String },
    /// Edit the uploader blacklist
    Blacklist {
        #[command(subcommand)]
        cmd: BlacklistSub,
    },
}

#[derive(Subcommand)]
pub enum BlacklistSub {
    /// Replace the whole list; names may be separated by newlines, commas, semicolons or spaces
    Set { text: String },
    Add { #[arg(required = true)] names: Vec<String> },
    Rm { #[arg(required = true)] names: Vec<String> },
    Ls,
}

#[derive(Serialize)]
struct SettingsView {
    path: String,
    token_set: bool,
    token: Option<String>,
    blacklist: Vec<String>,
}

pub fn run(cfg: &AppConfig, args: SettingsCmd) -> Result<()> {
    let log = telemetry::settings();
    let _g = log.root_span_kv([("path", cfg.settings_path.display().to_string())]).entered();

    let mut settings = {
        let _s = log.span(&SettingsPhase::Load).entered();
        store::load(&cfg.settings_path)?
    };

    let changed = match args.cmd {
        SettingsSub::Show => false,
        SettingsSub::SetToken { token } => {
            if !settings.set_token(&token) { bail!("Token must not be empty"); }
            log.info("🔑 CSRF token saved");
            true
        }
        SettingsSub::Blacklist { cmd: BlacklistSub::Set { text } } => {
            let names = parse_blacklist(&text);
            settings.set_blacklist(names.iter().map(String::as_str));
            log.info(format!("🚫 Blacklist replaced ({} names)", settings.up_blacklist.len()));
            true
        }
        SettingsSub::Blacklist { cmd: BlacklistSub::Add { names } } => {
            settings.add_to_blacklist(&names);
            log.info(format!("🚫 Blacklist now has {} names", settings.up_blacklist.len()));
            true
        }
        SettingsSub::Blacklist { cmd: BlacklistSub::Rm { names } } => {
            let removed = settings.remove_from_blacklist(&names);
            log.info(format!("🚫 Removed {} names", removed));
            removed > 0
        }
        SettingsSub::Blacklist { cmd: BlacklistSub::Ls } => false,
    };

    if changed {
        let _s = log.span(&SettingsPhase::Save).entered();
        store::save(&cfg.settings_path, &settings)?;
    }

    let view = SettingsView {
        path: cfg.settings_path.display().to_string(),
        token_set: settings.bili_jct.is_some(),
        token: settings.bili_jct.as_deref().map(mask_token),
        blacklist: settings.up_blacklist.clone(),
    };
    log.info(format!("⚙️  {}", view.path));
    log.info(format!("  token: {}", view.token.as_deref().unwrap_or("(not set)")));
    log.info(format!("  blacklist: {}", if view.blacklist.is_empty() { "(empty)".to_string() } else { view.blacklist.join(", ") }));
    if telemetry::config::json_mode() {
        log.result(&view)?;
    }
    Ok(())
}

/// Show only the first and last few characters of a token.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::mask_token;

    #[test]
    fn masks_tokens() {
        assert_eq!(mask_token("0123456789abcdef0123456789abcdef"), "0123…cdef");
        assert_eq!(mask_token("short"), "*****");
    }
}
