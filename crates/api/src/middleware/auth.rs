//! Credential extraction for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT, AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use maintdesk_core::identity::IdentityClaim;

use crate::auth::jwt::verify;
use crate::error::{AppError, AuthRejection};
use crate::state::AppState;

/// Name of the cookie that carries the credential for browser sessions.
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated caller, decoded from the request's credential.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(subject_id = %user.claim.subject_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claim: IdentityClaim,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = credential_from_headers(&parts.headers);

        match verify(credential.as_deref(), &state.config.jwt) {
            Ok(claim) => Ok(AuthUser { claim }),
            Err(reason) => Err(AppError::Auth(AuthRejection {
                reason,
                wants_html: prefers_html(&parts.headers),
            })),
        }
    }
}

/// Pick the credential to verify.
///
/// An `Authorization` header always wins over the session cookie, so API
/// clients can override a browser session. A header without the `Bearer `
/// scheme is still used (and is rejected as malformed) rather than falling
/// back to the cookie.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let raw = value.to_str().unwrap_or_default();
        let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Whether the client ranks `text/html` ahead of `application/json`.
pub fn prefers_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    accept
        .split(',')
        .map(|media| media.split(';').next().unwrap_or_default().trim())
        .find(|media| *media == "text/html" || *media == "application/json")
        == Some("text/html")
}
