//! User entity model and DTOs.

use maintdesk_core::types::{SubjectId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserSummary`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub subject_id: SubjectId,
    pub display_name: String,
    /// Role name as stored; resolved to a `Role` by the token codec.
    pub role: String,
    pub location: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserSummary {
    pub subject_id: SubjectId,
    pub display_name: String,
    pub role: String,
    pub location: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            subject_id: user.subject_id.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            location: user.location.clone(),
        }
    }
}
