// crates/survey-config/tests/config_loading.rs
// ============================================================================
// Module: Config Loading Tests
// Description: Defaults, file parsing, environment overrides, and validation.
// Purpose: Ensure config loading fails closed and overrides apply in order.
// Dependencies: survey-config, survey-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Loads configs from temp files with a hermetic environment lookup.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::path::PathBuf;

use survey_config::ConfigError;
use survey_config::IdentityConfig;
use survey_config::RunEnvironment;
use survey_config::SurveyConfig;
use survey_store_sqlite::SqliteStoreMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> =
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("survey.toml");
    std::fs::write(&path, content).unwrap();
    path
}

const FULL_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:8080"
environment = "production"
max_body_bytes = 1024
cors_origins = ["https://monitor.example.org"]
[server.rate_limit]
max_requests = 10
window_ms = 1000
max_entries = 16

[auth]
admin_emails = ["Admin@Example.org"]
[auth.identity]
type = "static"
tokens = [{ token = "secret-token", email = "admin@example.org" }]

[store]
path = "db/survey.sqlite"
journal_mode = "delete"

[collection]
default_page_size = 50
require_location = false
"#;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn explicit_file_is_parsed() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, FULL_CONFIG);
    let config = SurveyConfig::load_with_env(Some(path.as_path()), env_of(&[])).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert!(config.server.environment.is_production());
    assert_eq!(config.server.rate_limit.max_requests, 10);
    assert_eq!(config.collection.default_page_size, 50);
    assert!(!config.collection.require_location);
    assert_eq!(config.store.journal_mode, SqliteStoreMode::Delete);
    assert_eq!(config.store.busy_timeout_ms, 5_000);
    assert!(config.auth.is_admin("admin@EXAMPLE.org"));
    assert!(!config.auth.is_admin("other@example.org"));
    assert!(matches!(config.auth.identity, Some(IdentityConfig::Static(_))));
}

#[test]
fn env_config_path_is_used_when_flag_is_absent() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, FULL_CONFIG);
    let pairs = [("SURVEY_CONFIG", path.to_str().unwrap())];
    let lookup = env_of(&pairs);
    let config = SurveyConfig::load_with_env(None, lookup).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:8080");
}

#[test]
fn defaults_validate() {
    let config = SurveyConfig::default();
    config.validate().unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:5000");
    assert_eq!(config.server.environment, RunEnvironment::Development);
    assert_eq!(config.server.max_body_bytes, 10 * 1024 * 1024);
    assert_eq!(config.server.rate_limit.window_ms, 900_000);
    assert_eq!(config.server.rate_limit.max_requests, 100);
    assert_eq!(config.collection.default_page_size, 20);
    assert!(config.collection.require_location);
    assert!(config.auth.admin_emails.is_empty());
    assert!(config.auth.identity.is_none());
}

#[test]
fn env_overrides_replace_file_values() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, FULL_CONFIG);
    let lookup = env_of(&[
        ("SURVEY_PORT", "9090"),
        ("SURVEY_ENV", "test"),
        ("SURVEY_CORS_ORIGINS", "http://a.test, http://b.test"),
        ("SURVEY_ADMIN_EMAILS", "one@x.nl,two@x.nl"),
        ("SURVEY_DB_PATH", "other.db"),
        ("SURVEY_RATE_LIMIT_WINDOW_MS", "2000"),
        ("SURVEY_RATE_LIMIT_MAX_REQUESTS", "7"),
    ]);
    let config = SurveyConfig::load_with_env(Some(path.as_path()), lookup).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:9090");
    assert_eq!(config.server.environment, RunEnvironment::Test);
    assert_eq!(config.server.cors_origins, vec!["http://a.test", "http://b.test"]);
    assert_eq!(config.auth.admin_emails, vec!["one@x.nl", "two@x.nl"]);
    assert_eq!(config.store.path, PathBuf::from("other.db"));
    assert_eq!(config.server.rate_limit.window_ms, 2_000);
    assert_eq!(config.server.rate_limit.max_requests, 7);
}

#[test]
fn identity_env_selects_hosted_provider() {
    let mut config = SurveyConfig::default();
    config
        .apply_env_overrides(env_of(&[
            ("SURVEY_IDENTITY_URL", "https://project.supabase.co"),
            ("SURVEY_IDENTITY_API_KEY", "anon-key"),
        ]))
        .unwrap();
    config.validate().unwrap();
    let Some(IdentityConfig::Supabase(supabase)) = &config.auth.identity else {
        panic!("expected hosted identity");
    };
    assert_eq!(supabase.url, "https://project.supabase.co");
    assert_eq!(supabase.timeout_ms, 5_000);

    let mut partial = SurveyConfig::default();
    partial.apply_env_overrides(env_of(&[("SURVEY_IDENTITY_URL", "https://x.test")])).unwrap();
    assert!(matches!(partial.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn malformed_overrides_are_rejected() {
    let mut config = SurveyConfig::default();
    let result = config.apply_env_overrides(env_of(&[("SURVEY_PORT", "http")]));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
    let result = config.apply_env_overrides(env_of(&[("SURVEY_ENV", "staging")]));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn invalid_sections_fail_closed() {
    let cases = [
        "[server]\nbind = \"not-an-address\"",
        "[server]\nmax_body_bytes = 0",
        "[server]\ncors_origins = [\"ftp://x\"]",
        "[server.rate_limit]\nmax_requests = 0",
        "[server.rate_limit]\nwindow_ms = 10",
        "[server.rate_limit]\nmax_entries = 100000",
        "[auth]\nadmin_emails = [\"nobody\"]",
        "[auth.identity]\ntype = \"static\"",
        "[auth.identity]\ntype = \"supabase\"\nurl = \"project.supabase.co\"\napi_key = \"k\"",
        "[collection]\ndefault_page_size = 101",
    ];
    for case in cases {
        let config = SurveyConfig::from_toml_str(case).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "accepted: {case}");
    }
}

#[test]
fn unknown_fields_are_parse_errors() {
    let result = SurveyConfig::from_toml_str("[server]\nport = 5000");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn oversized_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    let path = write_config(&temp, &padding);
    let result = SurveyConfig::load_with_env(Some(path.as_path()), env_of(&[]));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn missing_explicit_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");
    let result = SurveyConfig::load_with_env(Some(path.as_path()), env_of(&[]));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
