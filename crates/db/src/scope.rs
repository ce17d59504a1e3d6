//! Location filtering for dynamically built queries.

use maintdesk_core::guard::LocationScope;
use sqlx::{Postgres, QueryBuilder};

/// Append the caller's location equality filter to a query under construction.
///
/// The query must already have an open `WHERE` clause. [`LocationScope::Global`]
/// appends nothing. Every listing or lookup of tickets, technicians, and
/// breakdown/safety records goes through this function so the headquarters
/// override behaves the same everywhere.
pub fn scope_to_location(qb: &mut QueryBuilder<'_, Postgres>, scope: &LocationScope) {
    if let Some(location) = scope.location() {
        qb.push(" AND location = ").push_bind(location.to_string());
    }
}
