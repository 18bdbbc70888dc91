use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "portfolio.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub comments_limit: i64,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".into(),
            comments_limit: 10,
            request_timeout_secs: 10,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    comments_limit: Option<i64>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    load_settings_from(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` if it exists, then environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            if let Some(v) = file_cfg.backend_url {
                settings.backend_url = v;
            }
            if let Some(v) = file_cfg.comments_limit {
                settings.comments_limit = v;
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
            if let Some(v) = file_cfg.log_filter {
                settings.log_filter = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    if let Some(v) = env("PORTFOLIO_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("APP__COMMENTS_LIMIT") {
        if let Ok(parsed) = v.trim().parse::<i64>() {
            settings.comments_limit = parsed;
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(settings)
}
