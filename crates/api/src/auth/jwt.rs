//! Identity token codec: issues and verifies signed bearer credentials.
//!
//! Credentials are HS256-signed JWTs carrying a [`Claims`] payload with a
//! fixed seven-day validity window. Verification turns them back into an
//! [`IdentityClaim`], and this module is the one place where legacy role
//! names are resolved into a [`Role`].

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use maintdesk_core::identity::IdentityClaim;
use maintdesk_core::roles::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default credential lifetime in days.
pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// JWT claims embedded in every credential.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's stable subject id.
    pub sub: String,
    /// Display name shown in clients.
    pub name: String,
    /// Canonical role name.
    pub role: String,
    /// Organizational location the user belongs to.
    pub location: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier for audit.
    pub jti: String,
}

/// Configuration for credential issuance and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Credential lifetime in days (default: 7).
    pub expiry_days: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_days: i64 = std::env::var("JWT_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            expiry_days,
        }
    }

    /// Credential lifetime in seconds, for cookie `Max-Age`.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_days * 24 * 60 * 60
    }
}

/// Why a credential was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    /// No credential was presented at all.
    #[error("Missing credential")]
    Missing,
    /// Something was presented but it does not parse as a credential.
    #[error("Malformed credential")]
    Malformed,
    /// A well-formed credential failed signature, expiry, or claim checks.
    #[error("Invalid or expired credential")]
    Invalid,
}

/// Resolve a stored or embedded role name, accepting legacy aliases.
///
/// Matching is case-insensitive and treats `-` and spaces as `_`.
pub fn resolve_role(raw: &str) -> Option<Role> {
    let folded: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();

    match folded.as_str() {
        "normal_user" | "normaluser" | "user" | "normal" | "employee" => Some(Role::NormalUser),
        "technician" | "tech" => Some(Role::Technician),
        "planner" | "planning" => Some(Role::Planner),
        "admin" | "administrator" => Some(Role::Admin),
        _ => None,
    }
}

/// Issue a credential for the given identity.
pub fn issue(
    subject_id: &str,
    display_name: &str,
    role: Role,
    location: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let exp = now + config.expiry_secs();

    let claims = Claims {
        sub: subject_id.to_string(),
        name: display_name.to_string(),
        role: role.as_str().to_string(),
        location: location.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a presented credential and decode it into an identity claim.
///
/// `None` or an empty string is [`TokenRejection::Missing`], text that is not
/// a JWT at all is [`TokenRejection::Malformed`], and a parsed token that does
/// not verify is [`TokenRejection::Invalid`].
pub fn verify(
    credential: Option<&str>,
    config: &JwtConfig,
) -> Result<IdentityClaim, TokenRejection> {
    let token = credential
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TokenRejection::Missing)?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Credential failed verification");
        rejection_for(e.kind())
    })?
    .claims;

    let role = resolve_role(&claims.role).ok_or_else(|| {
        tracing::warn!(role = %claims.role, "Credential carries an unknown role");
        TokenRejection::Invalid
    })?;

    let issued_at = timestamp(claims.iat)?;
    let expires_at = timestamp(claims.exp)?;

    Ok(IdentityClaim {
        subject_id: claims.sub,
        display_name: claims.name,
        role,
        location: claims.location,
        issued_at,
        expires_at,
    })
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => TokenRejection::Malformed,
        _ => TokenRejection::Invalid,
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenRejection> {
    DateTime::from_timestamp(secs, 0).ok_or(TokenRejection::Invalid)
}
