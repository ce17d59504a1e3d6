//! The structured payload pushed to a subscriber's endpoints.

use chrono::{DateTime, Utc};
use maintdesk_core::types::DbId;
use serde::{Deserialize, Serialize};

pub const EVENT_TICKET_SUBMITTED: &str = "ticket.submitted";
pub const EVENT_TICKET_ASSIGNED: &str = "ticket.assigned";
pub const EVENT_TICKET_STARTED: &str = "ticket.started";
pub const EVENT_TICKET_COMPLETED: &str = "ticket.completed";

/// A notification addressed to one identity.
///
/// Constructed via [`PushMessage::new`] and enriched with
/// [`with_ticket`](PushMessage::with_ticket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Dot-separated event name, e.g. `"ticket.assigned"`.
    pub event_type: String,
    pub title: String,
    pub body: String,
    pub ticket_id: Option<DbId>,
    /// Client-side path to open when the notification is clicked.
    pub url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PushMessage {
    pub fn new(
        event_type: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            title: title.into(),
            body: body.into(),
            ticket_id: None,
            url: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the ticket this message is about, and link to it.
    pub fn with_ticket(mut self, ticket_id: DbId) -> Self {
        self.ticket_id = Some(ticket_id);
        self.url = Some(format!("/tickets/{ticket_id}"));
        self
    }
}
