use axum::routing::get;
use axum::Router;

use crate::handlers::directory;
use crate::state::AppState;

/// Technician directory and facility record routes, merged at the API root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/technicians", get(directory::technicians))
        .route("/records/breakdown", get(directory::breakdown_records))
        .route("/records/safety", get(directory::safety_records))
}
