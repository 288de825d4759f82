use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("definitely-missing.toml"), env_from(&[]));
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
}

#[test]
fn file_values_are_overridden_by_environment() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("dashboard_settings_test_{suffix}.toml"));
    fs::write(
        &path,
        "server_url = \"http://records.internal:8080\"\nrequest_timeout_secs = 3\n",
    )
    .expect("write settings");

    let from_file = load_settings_from(&path, env_from(&[]));
    assert_eq!(from_file.server_url, "http://records.internal:8080");
    assert_eq!(from_file.request_timeout_secs, 3);

    let overridden = load_settings_from(
        &path,
        env_from(&[
            ("DASHBOARD_SERVER_URL", "http://legacy:1"),
            ("APP__SERVER_URL", "http://override:2"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]),
    );
    assert_eq!(overridden.server_url, "http://override:2");
    assert_eq!(overridden.request_timeout_secs, 3);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_file_keeps_defaults() {
    let mut settings = ClientSettings::default();
    settings.apply_file("server_url = [not toml");
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn zero_timeout_is_clamped() {
    let settings = ClientSettings {
        request_timeout_secs: 0,
        ..ClientSettings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}
