//! Read-only directory endpoints for planners and admins: technicians and
//! breakdown/safety records, all limited to the caller's location scope.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use maintdesk_db::models::record::RecordKind;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePlanner;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/technicians
pub async fn technicians(
    RequirePlanner(auth): RequirePlanner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let scope = state.engine.scope_for(&auth.claim);
    let technicians = state.store.list_technicians(&scope).await?;
    Ok(Json(DataResponse { data: technicians }))
}

/// GET /api/v1/records/breakdown
pub async fn breakdown_records(
    auth: RequirePlanner,
    state: State<AppState>,
) -> AppResult<impl IntoResponse> {
    records(auth, state, RecordKind::Breakdown).await
}

/// GET /api/v1/records/safety
pub async fn safety_records(
    auth: RequirePlanner,
    state: State<AppState>,
) -> AppResult<impl IntoResponse> {
    records(auth, state, RecordKind::Safety).await
}

async fn records(
    RequirePlanner(auth): RequirePlanner,
    State(state): State<AppState>,
    kind: RecordKind,
) -> AppResult<impl IntoResponse> {
    let scope = state.engine.scope_for(&auth.claim);
    let records = state.store.list_records(kind, &scope).await?;
    tracing::debug!(
        subject_id = %auth.claim.subject_id,
        table = kind.table(),
        count = records.len(),
        "Listed facility records"
    );
    Ok(Json(DataResponse { data: records }))
}
