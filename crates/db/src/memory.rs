//! In-process [`TicketStore`] used by tests and database-less local runs.
//!
//! Mirrors the semantics of the PostgreSQL store: ids are monotonic, every
//! lookup honours the location scope, and transitions are conditional on the
//! expected pre-state so a stale update affects zero rows.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use maintdesk_core::guard::LocationScope;
use maintdesk_core::roles::ROLE_TECHNICIAN;
use maintdesk_core::ticket::TicketStatus;
use maintdesk_core::types::DbId;

use crate::models::record::{FacilityRecord, RecordKind};
use crate::models::ticket::{CreateTicket, Ticket, TicketFilter, TicketUpdate};
use crate::models::user::{User, UserSummary};
use crate::store::{StoreError, TicketStore};

#[derive(Default)]
struct Tables {
    next_ticket_id: DbId,
    tickets: BTreeMap<DbId, Ticket>,
    users: HashMap<String, User>,
    records: HashMap<RecordKind, Vec<FacilityRecord>>,
}

/// Memory-backed store. Cheap to construct; share it behind an `Arc`.
pub struct MemoryTicketStore {
    tables: Mutex<Tables>,
    available: AtomicBool,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Add or replace a user.
    pub fn insert_user(&self, user: User) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.users.insert(user.subject_id.clone(), user);
        }
    }

    /// Append a breakdown or safety record.
    pub fn insert_record(&self, kind: RecordKind, record: FacilityRecord) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.records.entry(kind).or_default().push(record);
        }
    }

    /// Number of tickets currently stored, regardless of scope.
    pub fn ticket_count(&self) -> usize {
        self.tables.lock().map(|t| t.tickets.len()).unwrap_or(0)
    }

    /// Simulate an outage: while unavailable every operation fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert_ticket(&self, input: &CreateTicket) -> Result<Ticket, StoreError> {
        let mut tables = self.tables()?;
        tables.next_ticket_id += 1;
        let now = Utc::now();
        let ticket = Ticket {
            id: tables.next_ticket_id,
            raised_by: input.raised_by.clone(),
            category: input.category.as_str().to_string(),
            description: input.description.clone(),
            building_no: input.building_no.clone(),
            area_code: input.area_code.clone(),
            sub_area: input.sub_area.clone(),
            keyword: input.keyword.clone(),
            location: input.location.clone(),
            status: TicketStatus::Open.as_str().to_string(),
            assigned_to: None,
            planner_id: None,
            completion_note: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        };
        tables.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn find_ticket(
        &self,
        id: DbId,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .tickets
            .get(&id)
            .filter(|t| scope.permits(&t.location))
            .cloned())
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .tickets
            .values()
            .rev()
            .filter(|t| filter.scope.permits(&t.location))
            .filter(|t| match &filter.involving {
                Some(subject) => {
                    &t.raised_by == subject || t.assigned_to.as_ref() == Some(subject)
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn update_ticket(
        &self,
        id: DbId,
        update: &TicketUpdate,
        scope: &LocationScope,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut tables = self.tables()?;
        let transition = update.transition();

        let Some(ticket) = tables.tickets.get_mut(&id) else {
            return Ok(None);
        };
        let in_expected_state = ticket
            .status
            .parse::<TicketStatus>()
            .map(|s| transition.permits(s))
            .unwrap_or(false);
        if !scope.permits(&ticket.location) || !in_expected_state {
            return Ok(None);
        }

        let now = Utc::now();
        match update {
            TicketUpdate::Assign {
                technician_id,
                planner_id,
            } => {
                ticket.assigned_to = Some(technician_id.clone());
                ticket.planner_id = Some(planner_id.clone());
            }
            TicketUpdate::Start => ticket.started_at = Some(now),
            TicketUpdate::Complete { note } => {
                ticket.completed_at = Some(now);
                ticket.completion_note = note.clone();
            }
        }
        ticket.status = transition.target().as_str().to_string();
        ticket.updated_at = now;

        Ok(Some(ticket.clone()))
    }

    async fn find_user(&self, subject_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.get(subject_id).cloned())
    }

    async fn list_technicians(
        &self,
        scope: &LocationScope,
    ) -> Result<Vec<UserSummary>, StoreError> {
        let tables = self.tables()?;
        let mut technicians: Vec<UserSummary> = tables
            .users
            .values()
            .filter(|u| u.role == ROLE_TECHNICIAN && scope.permits(&u.location))
            .map(UserSummary::from)
            .collect();
        technicians.sort_by(|a, b| {
            (&a.display_name, &a.subject_id).cmp(&(&b.display_name, &b.subject_id))
        });
        Ok(technicians)
    }

    async fn list_records(
        &self,
        kind: RecordKind,
        scope: &LocationScope,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        let tables = self.tables()?;
        let mut records: Vec<FacilityRecord> = tables
            .records
            .get(&kind)
            .map(|rows| {
                rows.iter()
                    .filter(|r| scope.permits(&r.location))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by(|a, b| (b.recorded_at, b.id).cmp(&(a.recorded_at, a.id)));
        Ok(records)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.tables().map(|_| ())
    }
}
