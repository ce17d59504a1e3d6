//! Ticket entity model and DTOs.

use maintdesk_core::error::CoreError;
use maintdesk_core::guard::{LocationScope, TicketAccess};
use maintdesk_core::ticket::{TicketCategory, TicketStatus, Transition};
use maintdesk_core::types::{DbId, SubjectId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `tickets` table.
///
/// `category` and `status` are stored as their canonical names; use
/// [`Ticket::status`] for the typed value.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub raised_by: SubjectId,
    pub category: String,
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
    pub location: String,
    pub status: String,
    pub assigned_to: Option<SubjectId>,
    pub planner_id: Option<SubjectId>,
    pub completion_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl Ticket {
    /// Parse the stored status.
    ///
    /// The column carries a CHECK constraint, so failure here means the row
    /// was written outside this service.
    pub fn status(&self) -> Result<TicketStatus, CoreError> {
        self.status.parse().map_err(|e: String| {
            CoreError::Internal(format!("Ticket {} has corrupt status: {e}", self.id))
        })
    }

    /// The fields the visibility rule looks at.
    pub fn access(&self) -> TicketAccess<'_> {
        TicketAccess {
            location: &self.location,
            raised_by: &self.raised_by,
            assigned_to: self.assigned_to.as_deref(),
        }
    }
}

/// DTO for inserting a new ticket. Status always starts at `Open`.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub raised_by: SubjectId,
    pub category: TicketCategory,
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
    /// Copied from the raiser's identity claim; never changes afterwards.
    pub location: String,
}

/// The field changes that accompany a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketUpdate {
    Assign {
        technician_id: SubjectId,
        planner_id: SubjectId,
    },
    Start,
    Complete {
        note: Option<String>,
    },
}

impl TicketUpdate {
    pub fn transition(&self) -> Transition {
        match self {
            TicketUpdate::Assign { .. } => Transition::Assign,
            TicketUpdate::Start => Transition::Start,
            TicketUpdate::Complete { .. } => Transition::Complete,
        }
    }
}

/// Which tickets a listing returns.
#[derive(Debug, Clone)]
pub struct TicketFilter {
    pub scope: LocationScope,
    /// When set, only tickets raised by or assigned to this subject.
    pub involving: Option<SubjectId>,
}
