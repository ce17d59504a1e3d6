//! Handlers for push subscription management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use maintdesk_events::PushSubscription;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `PUT /push/subscription`.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub endpoint: String,
    /// `false` when the endpoint was already registered.
    pub created: bool,
}

/// Response body for `GET /push/public-key`.
#[derive(Debug, Serialize)]
pub struct PublicKeyResponse {
    pub public_key: String,
}

/// PUT /api/v1/push/subscription
///
/// Register the caller's push endpoint. Re-registering the same endpoint is a
/// no-op answered with 200; a new endpoint is answered with 201.
pub async fn register(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<PushSubscription>,
) -> AppResult<impl IntoResponse> {
    input.endpoint = input.endpoint.trim().to_string();
    if input.endpoint.is_empty() {
        return Err(AppError::BadRequest("Subscription endpoint must not be empty".into()));
    }

    let endpoint = input.endpoint.clone();
    let created = state
        .registry
        .register(&auth.claim.subject_id, input)
        .await;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: SubscriptionResponse { endpoint, created },
        }),
    ))
}

/// GET /api/v1/push/public-key
///
/// The application server key clients pass to their push service when
/// subscribing.
pub async fn public_key(State(state): State<AppState>) -> Json<DataResponse<PublicKeyResponse>> {
    Json(DataResponse {
        data: PublicKeyResponse {
            public_key: state.config.push.public_key.clone(),
        },
    })
}
