//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use maintdesk_core::error::CoreError;
use maintdesk_core::identity::IdentityClaim;
use maintdesk_db::models::user::UserSummary;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{issue, resolve_role, JwtConfig};
use crate::auth::password::{verify_against_dummy, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, TOKEN_COOKIE};
use crate::response::DataResponse;
use crate::state::AppState;

const INVALID_LOGIN: &str = "Invalid subject id or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub subject_id: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Credential lifetime in seconds.
    pub expires_in: i64,
    pub user: UserSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Verify the password and issue a credential. The credential is returned in
/// the body and also set as an `HttpOnly` cookie for browser sessions.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let subject_id = input.subject_id.trim();

    let Some(user) = state.store.find_user(subject_id).await? else {
        // Keep unknown subjects as slow as wrong passwords.
        verify_against_dummy(&input.password);
        return Err(invalid_login());
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(subject_id = %user.subject_id, "Login rejected: wrong password");
        return Err(invalid_login());
    }

    let role = resolve_role(&user.role).ok_or_else(|| {
        tracing::warn!(
            subject_id = %user.subject_id,
            role = %user.role,
            "User has an unknown role"
        );
        invalid_login()
    })?;

    let config = &state.config.jwt;
    let token = issue(
        &user.subject_id,
        &user.display_name,
        role,
        &user.location,
        config,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(subject_id = %user.subject_id, role = %role, "User logged in");

    let cookie = session_cookie(&token, config);
    let body = LoginResponse {
        token,
        expires_in: config.expiry_secs(),
        user: UserSummary::from(&user),
    };

    Ok(([(SET_COOKIE, cookie)], Json(DataResponse { data: body })))
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Bearer credentials simply expire.
pub async fn logout() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(SET_COOKIE, cleared_cookie())])
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser) -> Json<DataResponse<IdentityClaim>> {
    Json(DataResponse { data: auth.claim })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_login() -> AppError {
    AppError::Core(CoreError::InvalidCredential(INVALID_LOGIN.into()))
}

fn session_cookie(token: &str, config: &JwtConfig) -> String {
    format!(
        "{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.expiry_secs()
    )
}

fn cleared_cookie() -> String {
    format!("{TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
