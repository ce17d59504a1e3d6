pub mod auth;
pub mod directory;
pub mod health;
pub mod push;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/logout                     clear session cookie (public)
/// /auth/me                         current identity
///
/// /tickets                         list, submit
/// /tickets/{id}                    get
/// /tickets/{id}/assign             assign (planner, admin)
/// /tickets/{id}/start              start (technician, planner, admin)
/// /tickets/{id}/complete           complete (technician, planner, admin)
///
/// /push/subscription               register endpoint (PUT)
/// /push/public-key                 application server key (public)
///
/// /technicians                     location's technicians (planner, admin)
/// /records/breakdown               breakdown log (planner, admin)
/// /records/safety                  safety log (planner, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tickets", tickets::router())
        .nest("/push", push::router())
        .merge(directory::router())
}
