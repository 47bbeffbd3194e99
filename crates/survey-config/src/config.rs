// crates/survey-config/src/config.rs
// ============================================================================
// Module: Survey Configuration
// Description: Configuration loading, overrides, and validation for the survey monitor.
// Purpose: Provide strict, fail-closed config parsing with safe defaults.
// Dependencies: serde, survey-core, survey-store-sqlite, thiserror, toml
// ============================================================================

//! ## Overview
//! The config file path resolves from the CLI flag, then `SURVEY_CONFIG`,
//! then `./survey.toml` when it exists. Without any file the defaults apply.
//! Environment overrides run after parsing and before validation; they are
//! read through a lookup closure so callers and tests control the source.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use survey_core::DEFAULT_PAGE_SIZE;
use survey_core::MAX_PAGE_SIZE;
use survey_store_sqlite::SqliteStoreConfig;
use survey_store_sqlite::SqliteStoreMode;
use survey_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SURVEY_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "survey.toml";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address.
const DEFAULT_BIND: &str = "0.0.0.0:5000";
/// Default request body limit (10 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
/// Default CORS origin for local frontends.
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
/// Maximum number of CORS origins.
const MAX_CORS_ORIGINS: usize = 64;
/// Maximum length of one CORS origin.
const MAX_ORIGIN_LENGTH: usize = 2048;
/// Default requests allowed per window.
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
/// Default rate limit window (15 minutes).
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 15 * 60 * 1000;
/// Default and maximum tracked rate limit clients.
const MAX_RATE_LIMIT_ENTRIES: usize = 65_536;
/// Maximum requests per window.
const MAX_RATE_LIMIT_REQUESTS: u32 = 100_000;
/// Minimum rate limit window in milliseconds.
const MIN_RATE_LIMIT_WINDOW_MS: u64 = 100;
/// Maximum rate limit window (one day).
const MAX_RATE_LIMIT_WINDOW_MS: u64 = 86_400_000;
/// Maximum number of admin emails.
const MAX_ADMIN_EMAILS: usize = 256;
/// Maximum length of an admin email.
const MAX_EMAIL_LENGTH: usize = 254;
/// Default identity provider timeout in milliseconds.
const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 5_000;
/// Minimum identity provider timeout in milliseconds.
const MIN_IDENTITY_TIMEOUT_MS: u64 = 100;
/// Maximum identity provider timeout in milliseconds.
const MAX_IDENTITY_TIMEOUT_MS: u64 = 60_000;
/// Maximum number of static identity tokens.
const MAX_STATIC_TOKENS: usize = 64;
/// Maximum static token length.
const MAX_STATIC_TOKEN_LENGTH: usize = 256;
/// Default database path.
const DEFAULT_DB_PATH: &str = "data/survey.db";
/// Default `SQLite` busy timeout in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Survey monitor configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Admin authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Storage configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Survey collection settings.
    #[serde(default)]
    pub collection: CollectionConfig,
}

impl SurveyConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| env::var(key).ok())
    }

    /// Loads configuration, reading environment values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_path(path, &lookup)? {
            Some(resolved) => Self::read_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Reads and parses a config file within the size limit.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Applies `SURVEY_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override value does not parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());

        if let Some(port) = read("SURVEY_PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| ConfigError::Invalid("SURVEY_PORT must be a port number".to_string()))?;
            let mut addr: SocketAddr = self
                .server
                .bind
                .parse()
                .map_err(|_| ConfigError::Invalid("server.bind must be a socket address".to_string()))?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }
        if let Some(environment) = read("SURVEY_ENV") {
            self.server.environment = RunEnvironment::parse(&environment).ok_or_else(|| {
                ConfigError::Invalid("SURVEY_ENV must be development, test, or production".to_string())
            })?;
        }
        if let Some(origins) = read("SURVEY_CORS_ORIGINS") {
            self.server.cors_origins = split_list(&origins);
        }
        if let Some(emails) = read("SURVEY_ADMIN_EMAILS") {
            self.auth.admin_emails = split_list(&emails);
        }
        if let Some(path) = read("SURVEY_DB_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(window) = read("SURVEY_RATE_LIMIT_WINDOW_MS") {
            self.server.rate_limit.window_ms = window.parse().map_err(|_| {
                ConfigError::Invalid("SURVEY_RATE_LIMIT_WINDOW_MS must be an integer".to_string())
            })?;
        }
        if let Some(max) = read("SURVEY_RATE_LIMIT_MAX_REQUESTS") {
            self.server.rate_limit.max_requests = max.parse().map_err(|_| {
                ConfigError::Invalid("SURVEY_RATE_LIMIT_MAX_REQUESTS must be an integer".to_string())
            })?;
        }

        let url = read("SURVEY_IDENTITY_URL");
        let api_key = read("SURVEY_IDENTITY_API_KEY");
        if url.is_some() || api_key.is_some() {
            match &mut self.auth.identity {
                Some(IdentityConfig::Supabase(supabase)) => {
                    if let Some(url) = url {
                        supabase.url = url;
                    }
                    if let Some(api_key) = api_key {
                        supabase.api_key = api_key;
                    }
                }
                _ => {
                    self.auth.identity = Some(IdentityConfig::Supabase(SupabaseIdentityConfig {
                        url: url.unwrap_or_default(),
                        api_key: api_key.unwrap_or_default(),
                        timeout_ms: DEFAULT_IDENTITY_TIMEOUT_MS,
                    }));
                }
            }
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.store.validate()?;
        self.collection.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnvironment {
    /// Local development; error details are exposed.
    #[default]
    Development,
    /// Automated test runs.
    Test,
    /// Production; error details are withheld.
    Production,
}

impl RunEnvironment {
    /// Returns the environment label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    /// Parses an environment label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Self::Development),
            "test" => Some(Self::Test),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// Returns true for production deployments.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Deployment environment.
    #[serde(default)]
    pub environment: RunEnvironment,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Allowed CORS origins.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Per-client rate limit.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            environment: RunEnvironment::default(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: default_cors_origins(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid("server.bind must be a socket address".to_string()))
    }

    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.cors_origins.len() > MAX_CORS_ORIGINS {
            return Err(ConfigError::Invalid("server.cors_origins has too many entries".to_string()));
        }
        for origin in &self.cors_origins {
            if origin.len() > MAX_ORIGIN_LENGTH {
                return Err(ConfigError::Invalid("cors origin exceeds length limit".to_string()));
            }
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "cors origin must start with http:// or https://: {origin}"
                )));
            }
        }
        self.rate_limit.validate()
    }
}

/// Fixed-window rate limit configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
    /// Window duration in milliseconds.
    #[serde(default = "default_rate_limit_window_ms")]
    pub window_ms: u64,
    /// Maximum number of tracked clients.
    #[serde(default = "default_rate_limit_max_entries")]
    pub max_entries: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_rate_limit_max_requests(),
            window_ms: default_rate_limit_window_ms(),
            max_entries: default_rate_limit_max_entries(),
        }
    }
}

impl RateLimitConfig {
    /// Validates rate limit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_requests == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit max_requests must be greater than zero".to_string(),
            ));
        }
        if self.max_requests > MAX_RATE_LIMIT_REQUESTS {
            return Err(ConfigError::Invalid("rate_limit max_requests too large".to_string()));
        }
        if self.window_ms < MIN_RATE_LIMIT_WINDOW_MS || self.window_ms > MAX_RATE_LIMIT_WINDOW_MS {
            return Err(ConfigError::Invalid(format!(
                "rate_limit window_ms must be between {MIN_RATE_LIMIT_WINDOW_MS} and \
                 {MAX_RATE_LIMIT_WINDOW_MS}",
            )));
        }
        if self.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit max_entries must be greater than zero".to_string(),
            ));
        }
        if self.max_entries > MAX_RATE_LIMIT_ENTRIES {
            return Err(ConfigError::Invalid("rate_limit max_entries too large".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Auth
// ============================================================================

/// Admin authentication configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Emails allowed to call admin routes. Empty denies everyone.
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// Identity provider resolving bearer tokens to emails.
    #[serde(default)]
    pub identity: Option<IdentityConfig>,
}

impl AuthConfig {
    /// Returns true when `email` is on the allow-list (case-insensitive).
    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim();
        self.admin_emails.iter().any(|allowed| allowed.trim().eq_ignore_ascii_case(email))
    }

    /// Validates auth settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_emails.len() > MAX_ADMIN_EMAILS {
            return Err(ConfigError::Invalid("auth.admin_emails has too many entries".to_string()));
        }
        for email in &self.admin_emails {
            let email = email.trim();
            if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || !email.contains('@') {
                return Err(ConfigError::Invalid(format!("invalid admin email: {email}")));
            }
        }
        match &self.identity {
            None => Ok(()),
            Some(IdentityConfig::Supabase(supabase)) => supabase.validate(),
            Some(IdentityConfig::Static(table)) => table.validate(),
        }
    }
}

/// Identity provider selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentityConfig {
    /// Hosted auth service resolving tokens over HTTP.
    Supabase(SupabaseIdentityConfig),
    /// Fixed token table for local development and tests.
    Static(StaticIdentityConfig),
}

/// Hosted identity provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseIdentityConfig {
    /// Base URL of the auth service.
    pub url: String,
    /// API key sent with each lookup.
    pub api_key: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_identity_timeout_ms")]
    pub timeout_ms: u64,
}

impl SupabaseIdentityConfig {
    /// Validates hosted identity settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "auth.identity.url must start with http:// or https://".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.identity.api_key must be set".to_string()));
        }
        if self.timeout_ms < MIN_IDENTITY_TIMEOUT_MS || self.timeout_ms > MAX_IDENTITY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "auth.identity.timeout_ms must be between {MIN_IDENTITY_TIMEOUT_MS} and \
                 {MAX_IDENTITY_TIMEOUT_MS}",
            )));
        }
        Ok(())
    }
}

/// Static token table.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticIdentityConfig {
    /// Token to email bindings.
    #[serde(default)]
    pub tokens: Vec<StaticTokenConfig>,
}

impl StaticIdentityConfig {
    /// Validates the token table.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.is_empty() {
            return Err(ConfigError::Invalid(
                "static identity requires at least one token".to_string(),
            ));
        }
        if self.tokens.len() > MAX_STATIC_TOKENS {
            return Err(ConfigError::Invalid("static identity has too many tokens".to_string()));
        }
        for entry in &self.tokens {
            if entry.token.is_empty() || entry.token.len() > MAX_STATIC_TOKEN_LENGTH {
                return Err(ConfigError::Invalid("static identity token length invalid".to_string()));
            }
            if entry.token.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(
                    "static identity token must not contain whitespace".to_string(),
                ));
            }
            if !entry.email.contains('@') {
                return Err(ConfigError::Invalid(format!(
                    "static identity email invalid: {}",
                    entry.email
                )));
            }
        }
        Ok(())
    }
}

/// One static token binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticTokenConfig {
    /// Bearer token value.
    pub token: String,
    /// Email the token resolves to.
    pub email: String,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite` storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file path.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// Sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the `SQLite` store configuration.
    #[must_use]
    pub fn sqlite(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }

    /// Validates storage settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.path must be set".to_string()));
        }
        validate_path(&self.path)
    }
}

// ============================================================================
// SECTION: Collection
// ============================================================================

/// Survey collection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Page size used when a listing omits `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Whether submissions must name a location.
    #[serde(default = "default_require_location")]
    pub require_location: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            require_location: default_require_location(),
        }
    }
}

impl CollectionConfig {
    /// Validates collection settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "collection.default_page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the working directory.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR).filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(local.is_file().then_some(local))
}

/// Validates a path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Splits a comma list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect()
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default CORS origin list.
fn default_cors_origins() -> Vec<String> {
    vec![DEFAULT_CORS_ORIGIN.to_string()]
}

/// Returns the default requests per window.
const fn default_rate_limit_max_requests() -> u32 {
    DEFAULT_RATE_LIMIT_MAX_REQUESTS
}

/// Returns the default window length.
const fn default_rate_limit_window_ms() -> u64 {
    DEFAULT_RATE_LIMIT_WINDOW_MS
}

/// Returns the default tracked client cap.
const fn default_rate_limit_max_entries() -> usize {
    MAX_RATE_LIMIT_ENTRIES
}

/// Returns the default identity timeout.
const fn default_identity_timeout_ms() -> u64 {
    DEFAULT_IDENTITY_TIMEOUT_MS
}

/// Returns the default database path.
fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

/// Returns the default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default page size.
const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Locations are required unless disabled.
const fn default_require_location() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a@x.nl, ,b@x.nl,"), vec!["a@x.nl".to_string(), "b@x.nl".to_string()]);
    }

    #[test]
    fn overlong_component_is_rejected() {
        let path = PathBuf::from("a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(validate_path(&path).is_err());
    }
}
