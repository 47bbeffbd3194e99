// crates/survey-server/src/auth.rs
// ============================================================================
// Module: Admin Authentication
// Description: Bearer token resolution and email allow-list enforcement.
// Purpose: Gate admin routes behind an identity provider and configured emails.
// Dependencies: async-trait, axum, reqwest, serde, sha2, survey-config
// ============================================================================

//! ## Overview
//! Admin routes accept `Authorization: Bearer <token>`. The token is resolved
//! to an email by an [`IdentityProvider`]; the email must appear in the
//! configured allow-list. Every decision emits an audit event carrying a
//! SHA-256 fingerprint of the token, never the token itself. All checks fail
//! closed: no provider or an empty allow-list denies every caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use sha2::Digest;
use sha2::Sha256;
use survey_config::AuthConfig;
use survey_config::IdentityConfig;
use survey_config::RunEnvironment;
use thiserror::Error;

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted `Authorization` header.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;
/// Audit event name for admin decisions.
const AUDIT_EVENT: &str = "admin_authz";

// ============================================================================
// SECTION: Identity Providers
// ============================================================================

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Email reported by the provider, when any.
    pub email: Option<String>,
}

/// Identity lookup failures.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the token.
    #[error("token rejected")]
    Rejected,
    /// The provider could not be reached or answered unexpectedly.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Resolves bearer tokens to identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves `token` to an identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the token is rejected or the provider fails.
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError>;
}

/// Hosted auth service provider (`GET {url}/auth/v1/user`).
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
pub struct SupabaseIdentityProvider {
    /// Auth service base URL (no trailing slash).
    base_url: String,
    /// API key sent as the `apikey` header.
    api_key: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

/// User payload subset returned by the auth service.
#[derive(Debug, Deserialize)]
struct UserRecord {
    /// User email.
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseIdentityProvider {
    /// Builds a hosted identity provider.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] when the HTTP client cannot be built.
    pub fn new(
        mut base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|err| IdentityError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| IdentityError::Unavailable(err.to_string()))?;
        match response.status() {
            StatusCode::OK => {
                let user: UserRecord = response
                    .json()
                    .await
                    .map_err(|err| IdentityError::Unavailable(err.to_string()))?;
                Ok(Identity {
                    email: user.email,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::Rejected),
            status => Err(IdentityError::Unavailable(format!("identity provider status {status}"))),
        }
    }
}

/// Fixed token table for local development and tests.
pub struct StaticIdentityProvider {
    /// Token to email bindings.
    tokens: BTreeMap<String, String>,
}

impl StaticIdentityProvider {
    /// Builds a provider from `(token, email)` pairs.
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tokens: pairs.into_iter().collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        self.tokens
            .get(token)
            .map(|email| Identity {
                email: Some(email.clone()),
            })
            .ok_or(IdentityError::Rejected)
    }
}

/// Builds the configured identity provider, if any.
///
/// # Errors
///
/// Returns [`IdentityError`] when the hosted client cannot be built.
pub fn identity_from_config(
    config: Option<&IdentityConfig>,
) -> Result<Option<Arc<dyn IdentityProvider>>, IdentityError> {
    let Some(config) = config else {
        return Ok(None);
    };
    let provider: Arc<dyn IdentityProvider> = match config {
        IdentityConfig::Supabase(hosted) => Arc::new(SupabaseIdentityProvider::new(
            hosted.url.clone(),
            hosted.api_key.clone(),
            Duration::from_millis(hosted.timeout_ms),
        )?),
        IdentityConfig::Static(table) => Arc::new(StaticIdentityProvider::new(
            table.tokens.iter().map(|entry| (entry.token.clone(), entry.email.clone())),
        )),
    };
    Ok(Some(provider))
}

// ============================================================================
// SECTION: Admin Gate
// ============================================================================

/// Admin authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Missing or malformed credentials, or an unreachable provider.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// The provider rejected the token.
    #[error("invalid token")]
    InvalidToken,
    /// The caller is authenticated but not on the allow-list.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Authenticated admin caller.
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Lowercased admin email.
    pub email: String,
    /// SHA-256 fingerprint of the bearer token.
    pub token_fingerprint: String,
}

/// Admin route gate combining the identity provider and allow-list.
pub struct AdminGate {
    /// Identity provider; `None` denies every caller.
    provider: Option<Arc<dyn IdentityProvider>>,
    /// Lowercased allow-list.
    admins: BTreeSet<String>,
    /// Deployment environment for diagnostics.
    environment: RunEnvironment,
}

impl AdminGate {
    /// Creates a gate.
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn IdentityProvider>>,
        admin_emails: &[String],
        environment: RunEnvironment,
    ) -> Self {
        let admins = admin_emails
            .iter()
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self {
            provider,
            admins,
            environment,
        }
    }

    /// Builds a gate from auth configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity provider cannot be built.
    pub fn from_config(
        config: &AuthConfig,
        environment: RunEnvironment,
    ) -> Result<Self, IdentityError> {
        let provider = identity_from_config(config.identity.as_ref())?;
        Ok(Self::new(provider, &config.admin_emails, environment))
    }

    /// Returns true when an identity provider is configured.
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Authorizes an admin request from its headers.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the caller is not an authorized admin.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        peer_ip: Option<IpAddr>,
    ) -> Result<AdminContext, AuthError> {
        let header = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
        let result = self.decide(header).await;
        let fingerprint = parse_bearer_token(header)
            .map_or_else(|_| "none".to_string(), |token| token_fingerprint(&token));
        let peer = peer_ip.map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
        match &result {
            Ok(admin) => tracing::info!(
                event = AUDIT_EVENT,
                decision = "allow",
                email = %admin.email,
                token_fingerprint = %fingerprint,
                peer_ip = %peer,
                "admin request authorized"
            ),
            Err(error) => tracing::warn!(
                event = AUDIT_EVENT,
                decision = "deny",
                reason = %error,
                token_fingerprint = %fingerprint,
                peer_ip = %peer,
                "admin request denied"
            ),
        }
        result
    }

    /// Runs the token and allow-list checks.
    async fn decide(&self, header: Option<&str>) -> Result<AdminContext, AuthError> {
        let token = parse_bearer_token(header)?;
        let Some(provider) = &self.provider else {
            return Err(AuthError::Unauthenticated("no identity provider configured".to_string()));
        };
        let identity = provider.resolve(&token).await.map_err(|err| match err {
            IdentityError::Rejected => AuthError::InvalidToken,
            IdentityError::Unavailable(message) => AuthError::Unauthenticated(message),
        })?;
        let email = identity.email.unwrap_or_default().trim().to_lowercase();
        if self.admins.is_empty() || !self.admins.contains(&email) {
            if self.environment == RunEnvironment::Development {
                tracing::warn!(email = %email, admins = self.admins.len(), "admin check failed");
            }
            return Err(AuthError::Forbidden("email not in admin allow-list".to_string()));
        }
        Ok(AdminContext {
            email,
            token_fingerprint: token_fingerprint(&token),
        })
    }
}

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let peer_ip = parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|info| info.0.ip());
        state.gate.authorize(&parts.headers, peer_ip).await.map_err(ApiError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts a bearer token; the scheme is case-insensitive.
///
/// # Errors
///
/// Returns [`AuthError::Unauthenticated`] when the header is missing, too
/// large, or not a bearer credential.
pub fn parse_bearer_token(auth_header: Option<&str>) -> Result<String, AuthError> {
    let header = auth_header
        .ok_or_else(|| AuthError::Unauthenticated("missing authorization".to_string()))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::Unauthenticated("authorization header too large".to_string()));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token.to_string())
}

/// Returns the lowercase hex SHA-256 of `token`.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let digest = Sha256::digest(token.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
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
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(parse_bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert_eq!(parse_bearer_token(Some("  BEARER   abc ")).unwrap(), "abc");
    }

    #[test]
    fn malformed_headers_are_unauthenticated() {
        for header in [None, Some("Basic abc"), Some("Bearer"), Some("Bearer   ")] {
            assert!(matches!(parse_bearer_token(header), Err(AuthError::Unauthenticated(_))));
        }
        let oversized = format!("Bearer {}", "a".repeat(MAX_AUTH_HEADER_BYTES));
        assert!(parse_bearer_token(Some(&oversized)).is_err());
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        assert_eq!(
            token_fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn gate_checks_allow_list_case_insensitively() {
        let provider: Arc<dyn IdentityProvider> = Arc::new(StaticIdentityProvider::new([
            ("admin-token".to_string(), "Admin@Example.org".to_string()),
            ("user-token".to_string(), "user@example.org".to_string()),
        ]));
        let gate = AdminGate::new(Some(provider), &["admin@example.ORG".to_string()], RunEnvironment::Test);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer admin-token".parse().unwrap());
        let admin = gate.authorize(&headers, None).await.unwrap();
        assert_eq!(admin.email, "admin@example.org");

        headers.insert(AUTHORIZATION, "Bearer user-token".parse().unwrap());
        assert!(matches!(gate.authorize(&headers, None).await, Err(AuthError::Forbidden(_))));

        headers.insert(AUTHORIZATION, "Bearer unknown".parse().unwrap());
        assert_eq!(gate.authorize(&headers, None).await.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn empty_allow_list_denies_everyone() {
        let provider: Arc<dyn IdentityProvider> =
            Arc::new(StaticIdentityProvider::new([("t".to_string(), "a@b.nl".to_string())]));
        let gate = AdminGate::new(Some(provider), &[], RunEnvironment::Test);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer t".parse().unwrap());
        assert!(matches!(gate.authorize(&headers, None).await, Err(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn missing_provider_is_unauthenticated() {
        let gate = AdminGate::new(None, &["a@b.nl".to_string()], RunEnvironment::Test);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer t".parse().unwrap());
        assert!(matches!(gate.authorize(&headers, None).await, Err(AuthError::Unauthenticated(_))));
    }
}
