//! Repository for the `users` table.

use maintdesk_core::guard::LocationScope;
use maintdesk_core::roles::ROLE_TECHNICIAN;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::user::{User, UserSummary};
use crate::scope::scope_to_location;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "subject_id, display_name, role, location, password_hash, created_at";

/// Provides read access to the identity store.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by subject id.
    pub async fn find_by_subject(
        pool: &PgPool,
        subject_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE subject_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(subject_id)
            .fetch_optional(pool)
            .await
    }

    /// List technicians visible within `scope`, ordered by display name.
    pub async fn list_technicians(
        pool: &PgPool,
        scope: &LocationScope,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT subject_id, display_name, role, location FROM users WHERE role = ",
        );
        qb.push_bind(ROLE_TECHNICIAN);
        scope_to_location(&mut qb, scope);
        qb.push(" ORDER BY display_name, subject_id");
        qb.build_query_as::<UserSummary>().fetch_all(pool).await
    }
}
