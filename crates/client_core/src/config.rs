use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn apply_file(&mut self, raw: &str) {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    self.server_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    self.request_timeout_secs = v;
                }
            }
            Err(err) => warn!(%err, "ignoring malformed dashboard settings file"),
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("DASHBOARD_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = lookup("APP__SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
    }
}

/// Defaults, then `dashboard.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |name| {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    })
}

pub fn load_settings_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();
    if let Ok(raw) = fs::read_to_string(path) {
        settings.apply_file(&raw);
    }
    settings.apply_env(lookup);
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
