use super::*;

#[test]
fn file_keys_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "bind_addr = \"0.0.0.0:8080\"\nroster_path = \"/srv/roster.csv\"\n",
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.roster_path, PathBuf::from("/srv/roster.csv"));
    assert_eq!(settings.invoice_dir, PathBuf::from("invoices"));
}

#[test]
fn app_prefixed_env_wins_over_legacy_name() {
    let mut settings = Settings::default();
    apply_env(&mut settings, |name| match name {
        "SERVER_BIND" => Some("127.0.0.1:1".to_string()),
        "APP__BIND_ADDR" => Some("127.0.0.1:2".to_string()),
        "APP__INVOICE_DIR" => Some("/tmp/pdfs".to_string()),
        _ => None,
    });
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.invoice_dir, PathBuf::from("/tmp/pdfs"));
    assert_eq!(settings.roster_path, PathBuf::from("data.csv"));
}

#[test]
fn malformed_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = [");
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
}
