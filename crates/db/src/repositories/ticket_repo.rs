//! Repository for the `tickets` table.

use maintdesk_core::guard::LocationScope;
use maintdesk_core::ticket::TicketStatus;
use maintdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::ticket::{CreateTicket, Ticket, TicketFilter, TicketUpdate};
use crate::scope::scope_to_location;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, raised_by, category, description, building_no, area_code, \
                        sub_area, keyword, location, status, assigned_to, planner_id, \
                        completion_note, created_at, updated_at, started_at, completed_at";

/// Provides ticket persistence operations. All reads and writes take the
/// caller's [`LocationScope`].
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new `Open` ticket, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets
                (raised_by, category, description, building_no, area_code, sub_area,
                 keyword, location, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.raised_by)
            .bind(input.category.as_str())
            .bind(&input.description)
            .bind(&input.building_no)
            .bind(&input.area_code)
            .bind(&input.sub_area)
            .bind(&input.keyword)
            .bind(&input.location)
            .bind(TicketStatus::Open.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by id, restricted to `scope`.
    ///
    /// Returns `None` both when the row does not exist and when it lies
    /// outside the scope.
    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM tickets WHERE id = "));
        qb.push_bind(id);
        scope_to_location(&mut qb, scope);
        qb.build_query_as::<Ticket>().fetch_optional(pool).await
    }

    /// List tickets matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &TicketFilter) -> Result<Vec<Ticket>, sqlx::Error> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM tickets WHERE TRUE"));
        scope_to_location(&mut qb, &filter.scope);
        if let Some(subject) = &filter.involving {
            qb.push(" AND (raised_by = ")
                .push_bind(subject.clone())
                .push(" OR assigned_to = ")
                .push_bind(subject.clone())
                .push(")");
        }
        qb.push(" ORDER BY created_at DESC, id DESC");
        qb.build_query_as::<Ticket>().fetch_all(pool).await
    }

    /// Apply a transition as a single conditional update.
    ///
    /// The row changes only if it still exists, is in one of the transition's
    /// expected pre-states, and lies inside `scope`. Returns `None` when zero
    /// rows were affected.
    pub async fn apply_update(
        pool: &PgPool,
        id: DbId,
        update: &TicketUpdate,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let transition = update.transition();
        let expected: Vec<String> = transition
            .from_statuses()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE tickets SET ");
        match update {
            TicketUpdate::Assign {
                technician_id,
                planner_id,
            } => {
                qb.push("assigned_to = ")
                    .push_bind(technician_id.clone())
                    .push(", planner_id = ")
                    .push_bind(planner_id.clone());
            }
            TicketUpdate::Start => {
                qb.push("started_at = NOW()");
            }
            TicketUpdate::Complete { note } => {
                qb.push("completed_at = NOW(), completion_note = ")
                    .push_bind(note.clone());
            }
        }
        qb.push(", status = ")
            .push_bind(transition.target().as_str())
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(" AND status = ANY(")
            .push_bind(expected)
            .push(")");
        scope_to_location(&mut qb, scope);
        qb.push(" RETURNING ").push(COLUMNS);

        qb.build_query_as::<Ticket>().fetch_optional(pool).await
    }
}
