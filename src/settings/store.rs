use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::blacklist;

/// The persisted settings blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "biliJct", default, skip_serializing_if = "Option::is_none")]
    pub bili_jct: Option<String>,
    #[serde(rename = "upBlacklist", default)]
    pub up_blacklist: Vec<String>,
}

impl Settings {
    pub fn set_token(&mut self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }
        self.bili_jct = Some(token.to_string());
        true
    }

    pub fn set_blacklist<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.up_blacklist = blacklist::normalize(names);
    }

    pub fn add_to_blacklist(&mut self, names: &[String]) {
        let merged: Vec<String> = self.up_blacklist.iter().chain(names.iter()).cloned().collect();
        self.set_blacklist(merged.iter().map(String::as_str));
    }

    /// Returns how many entries were removed.
    pub fn remove_from_blacklist(&mut self, names: &[String]) -> usize {
        let before = self.up_blacklist.len();
        self.up_blacklist.retain(|n| !names.iter().any(|r| r.trim() == n));
        before - self.up_blacklist.len()
    }
}

/// `$XDG_CONFIG_HOME/toview/settings.json`, falling back to `~/.config`.
pub fn default_path() -> PathBuf {
    let root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    root.join("toview").join("settings.json")
}

/// Missing file reads as empty settings.
pub fn load(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Settings::default());
    }
    let mut settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    // hand-edited files may carry duplicates or padding
    let list = std::mem::take(&mut settings.up_blacklist);
    settings.set_blacklist(list.iter().map(String::as_str));
    Ok(settings)
}

pub fn save(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating settings directory {}", dir.display()))?;
    }
    let body = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, body + "\n")
        .with_context(|| format!("writing settings to {}", path.display()))?;
    Ok(())
}
