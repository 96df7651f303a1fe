use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::settings::{store, Settings};

/// Process-wide inputs resolved once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    /// Raw `Cookie` header value, e.g. `SESSDATA=…; bili_jct=…`.
    pub cookie: Option<String>,
}

impl AppConfig {
    pub fn new(settings_path: Option<PathBuf>, cookie: Option<String>) -> Self {
        AppConfig {
            settings_path: settings_path.unwrap_or_else(store::default_path),
            cookie: cookie.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Cookie,
    Settings,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Flag => "flag",
            TokenSource::Cookie => "cookie",
            TokenSource::Settings => "settings",
        }
    }
}

/// Value of one cookie in a `k=v; k2=v2` header string.
pub fn cookie_value<'a>(cookie: &'a str, name: &str) -> Option<&'a str> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Pick the CSRF token: explicit flag/env first, then the `bili_jct`
/// cookie, then the stored setting. There is no built-in fallback.
pub fn resolve_token(flag: Option<&str>, cookie: Option<&str>, settings: &Settings) -> Result<(String, TokenSource)> {
    if let Some(t) = flag.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok((t.to_string(), TokenSource::Flag));
    }
    if let Some(t) = cookie.and_then(|c| cookie_value(c, "bili_jct")) {
        return Ok((t.to_string(), TokenSource::Cookie));
    }
    if let Some(t) = settings.bili_jct.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok((t.to_string(), TokenSource::Settings));
    }
    bail!("No CSRF token: pass --csrf, set BILI_JCT, include bili_jct in the cookie, or run `toview settings set-token`")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(token: Option<&str>) -> Settings {
        Settings { bili_jct: token.map(str::to_string), up_blacklist: vec![] }
    }

    #[test]
    fn reads_cookie_values() {
        let c = "SESSDATA=abc%2C123; bili_jct=deadbeef ; DedeUserID=42";
        assert_eq!(cookie_value(c, "bili_jct"), Some("deadbeef"));
        assert_eq!(cookie_value(c, "DedeUserID"), Some("42"));
        assert_eq!(cookie_value(c, "buvid3"), None);
        assert_eq!(cookie_value("bili_jct=", "bili_jct"), None);
    }

    #[test]
    fn flag_beats_cookie_beats_settings() {
        let s = stored(Some("from-settings"));
        let cookie = Some("bili_jct=from-cookie");

        let (t, src) = resolve_token(Some("from-flag"), cookie, &s).unwrap();
        assert_eq!((t.as_str(), src), ("from-flag", TokenSource::Flag));

        let (t, src) = resolve_token(None, cookie, &s).unwrap();
        assert_eq!((t.as_str(), src), ("from-cookie", TokenSource::Cookie));

        let (t, src) = resolve_token(Some("  "), Some("SESSDATA=x"), &s).unwrap();
        assert_eq!((t.as_str(), src), ("from-settings", TokenSource::Settings));
    }

    #[test]
    fn no_token_anywhere_is_an_error() {
        assert!(resolve_token(None, None, &stored(None)).is_err());
        assert!(resolve_token(None, Some("SESSDATA=x"), &stored(Some(" "))).is_err());
    }
}
