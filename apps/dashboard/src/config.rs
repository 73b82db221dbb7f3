use std::{fs, io, path::Path};

use anyhow::Context;
use client_core::{ClientOptions, ReconcilePolicy, TogglePolicy};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub reconcile_on_failure: bool,
    pub discard_stale_responses: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            reconcile_on_failure: false,
            discard_stale_responses: false,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            toggle: TogglePolicy {
                reconcile_on_failure: self.reconcile_on_failure,
            },
            reconcile: ReconcilePolicy {
                discard_stale_responses: self.discard_stale_responses,
            },
            ..ClientOptions::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    reconcile_on_failure: Option<bool>,
    discard_stale_responses: Option<bool>,
    log_filter: Option<String>,
}

/// Defaults, then the optional TOML file, then environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.reconcile_on_failure {
        settings.reconcile_on_failure = v;
    }
    if let Some(v) = file_cfg.discard_stale_responses {
        settings.discard_stale_responses = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DASHBOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__RECONCILE_ON_FAILURE").as_deref().and_then(parse_flag) {
        settings.reconcile_on_failure = v;
    }
    if let Some(v) = lookup("APP__DISCARD_STALE_RESPONSES")
        .as_deref()
        .and_then(parse_flag)
    {
        settings.discard_stale_responses = v;
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
