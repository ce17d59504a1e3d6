use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use maintdesk_core::error::CoreError;
use maintdesk_db::StoreError;
use serde_json::json;

use crate::auth::jwt::TokenRejection;

/// Where browser navigations without a usable credential are sent.
pub const LOGIN_PATH: &str = "/login";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `maintdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request carried no usable credential.
    #[error(transparent)]
    Auth(#[from] AuthRejection),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

/// A credential rejection together with what the client said it accepts.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct AuthRejection {
    pub reason: TokenRejection,
    /// The request prefers an HTML page over JSON (browser navigation).
    pub wants_html: bool,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        if self.wants_html {
            return Redirect::to(LOGIN_PATH).into_response();
        }
        let (code, message) = match self.reason {
            TokenRejection::Missing | TokenRejection::Malformed => {
                ("UNAUTHENTICATED", "Authentication required")
            }
            TokenRejection::Invalid => ("INVALID_CREDENTIAL", "Invalid or expired credential"),
        };
        error_body(StatusCode::UNAUTHORIZED, code, message.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Auth(rejection) => return rejection.into_response(),

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                CoreError::Unauthenticated(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg)
                }
                CoreError::InvalidCredential(msg) => {
                    (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIAL", msg)
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
                CoreError::Persistence(msg) => {
                    tracing::error!(error = %msg, "Persistence failure");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "PERSISTENCE_FAILURE",
                        "The ticket store is unavailable".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        error_body(status, code, message)
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    let body = json!({
        "error": message,
        "code": code,
    });
    (status, axum::Json(body)).into_response()
}
