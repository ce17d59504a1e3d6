//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! in the required set. Ticket transitions check their own role sets inside
//! the lifecycle engine; these extractors guard the directory endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use maintdesk_core::guard::authorize;
use maintdesk_core::roles::ASSIGNER_ROLES;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `planner` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn planners_only(RequirePlanner(user): RequirePlanner) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePlanner(pub AuthUser);

impl FromRequestParts<AppState> for RequirePlanner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(Some(&user.claim), ASSIGNER_ROLES)?;
        Ok(RequirePlanner(user))
    }
}
