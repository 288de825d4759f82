use std::{collections::HashMap, fs, path::PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub roster_path: PathBuf,
    pub invoice_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            roster_path: "data.csv".into(),
            invoice_dir: "invoices".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |name| std::env::var(name).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("bind_addr") {
            settings.server_bind = v.clone();
        }
        if let Some(v) = file_cfg.get("roster_path") {
            settings.roster_path = v.into();
        }
        if let Some(v) = file_cfg.get("invoice_dir") {
            settings.invoice_dir = v.into();
        }
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("APP__ROSTER_PATH") {
        settings.roster_path = v.into();
    }

    if let Some(v) = lookup("APP__INVOICE_DIR") {
        settings.invoice_dir = v.into();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
