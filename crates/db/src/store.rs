//! The persistence seam consumed by the ticket lifecycle engine.
//!
//! [`TicketStore`] is the only way the rest of the service reaches stored
//! state. [`PgTicketStore`] backs it with PostgreSQL through the repository
//! layer; [`crate::memory::MemoryTicketStore`] backs it with process memory
//! for tests and database-less local runs.

use async_trait::async_trait;
use maintdesk_core::error::CoreError;
use maintdesk_core::guard::LocationScope;
use maintdesk_core::types::DbId;

use crate::models::record::{FacilityRecord, RecordKind};
use crate::models::ticket::{CreateTicket, Ticket, TicketFilter, TicketUpdate};
use crate::models::user::{User, UserSummary};
use crate::repositories::{RecordRepo, TicketRepo, UserRepo};
use crate::DbPool;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying query failed (connection, syntax, constraint, ...).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store cannot serve requests at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Ticket store operation failed");
        CoreError::Persistence(err.to_string())
    }
}

/// Persistence operations required by the service.
///
/// Every ticket read or write takes the caller's [`LocationScope`]; a row
/// outside the scope behaves exactly like a missing row.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket in the `Open` state.
    async fn insert_ticket(&self, input: &CreateTicket) -> Result<Ticket, StoreError>;

    /// Look up a ticket within `scope`.
    async fn find_ticket(
        &self,
        id: DbId,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, StoreError>;

    /// List tickets matching `filter`, newest first.
    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError>;

    /// Conditionally apply a transition. `None` means zero rows changed.
    async fn update_ticket(
        &self,
        id: DbId,
        update: &TicketUpdate,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, StoreError>;

    async fn find_user(&self, subject_id: &str) -> Result<Option<User>, StoreError>;

    async fn list_technicians(&self, scope: &LocationScope)
        -> Result<Vec<UserSummary>, StoreError>;

    async fn list_records(
        &self,
        kind: RecordKind,
        scope: &LocationScope,
    ) -> Result<Vec<FacilityRecord>, StoreError>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// PostgreSQL-backed [`TicketStore`].
#[derive(Clone)]
pub struct PgTicketStore {
    pool: DbPool,
}

impl PgTicketStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn insert_ticket(&self, input: &CreateTicket) -> Result<Ticket, StoreError> {
        Ok(TicketRepo::create(&self.pool, input).await?)
    }

    async fn find_ticket(
        &self,
        id: DbId,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, StoreError> {
        Ok(TicketRepo::find_scoped(&self.pool, id, scope).await?)
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError> {
        Ok(TicketRepo::list(&self.pool, filter).await?)
    }

    async fn update_ticket(
        &self,
        id: DbId,
        update: &TicketUpdate,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, StoreError> {
        Ok(TicketRepo::apply_update(&self.pool, id, update, scope).await?)
    }

    async fn find_user(&self, subject_id: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_subject(&self.pool, subject_id).await?)
    }

    async fn list_technicians(
        &self,
        scope: &LocationScope,
    ) -> Result<Vec<UserSummary>, StoreError> {
        Ok(UserRepo::list_technicians(&self.pool, scope).await?)
    }

    async fn list_records(
        &self,
        kind: RecordKind,
        scope: &LocationScope,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        Ok(RecordRepo::list(&self.pool, kind, scope).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
