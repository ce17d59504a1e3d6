//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET  /                -> list
/// POST /                -> submit
/// GET  /{id}            -> get
/// POST /{id}/assign     -> assign
/// POST /{id}/start      -> start
/// POST /{id}/complete   -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::submit))
        .route("/{id}", get(tickets::get))
        .route("/{id}/assign", post(tickets::assign))
        .route("/{id}/start", post(tickets::start))
        .route("/{id}/complete", post(tickets::complete))
}
