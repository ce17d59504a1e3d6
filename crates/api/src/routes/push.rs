//! Route definitions for push subscriptions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::push;
use crate::state::AppState;

/// Routes mounted at `/push`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscription", put(push::register))
        .route("/public-key", get(push::public_key))
}
