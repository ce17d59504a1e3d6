//! Handlers for the `/tickets` resource.
//!
//! Thin adapters over [`crate::engine::TicketEngine`]: extract the caller,
//! hand over the request, wrap the resulting ticket in the data envelope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use maintdesk_core::ticket::TicketSubmission;
use maintdesk_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /tickets/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub technician_id: String,
}

/// Request body for `POST /tickets/{id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    #[serde(default)]
    pub note: Option<String>,
}

/// POST /api/v1/tickets
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TicketSubmission>,
) -> AppResult<impl IntoResponse> {
    let ticket = state.engine.submit(&auth.claim, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tickets = state.engine.list(&auth.claim).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/{id}
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = state.engine.get(&auth.claim, id).await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/assign
pub async fn assign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    let ticket = state
        .engine
        .assign(&auth.claim, id, input.technician_id.trim())
        .await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/start
pub async fn start(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = state.engine.start(&auth.claim, id).await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/complete
///
/// The body is optional; `{ "note": "..." }` records a completion note.
pub async fn complete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    input: Option<Json<CompleteRequest>>,
) -> AppResult<impl IntoResponse> {
    let note = input.and_then(|Json(body)| body.note);
    let ticket = state.engine.complete(&auth.claim, id, note).await?;
    Ok(Json(DataResponse { data: ticket }))
}
