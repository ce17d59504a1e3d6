//! Guarded ticket transitions: submit, assign, start, complete.
//!
//! Each transition reads the ticket within the caller's scope, checks the
//! pre-state and then issues one conditional update. The update re-checks
//! status and scope, so a concurrent writer that got there first leaves
//! zero rows affected. A wrong pre-state, a scope miss and a lost race all
//! surface as NotFound.

use maintdesk_core::error::CoreError;
use maintdesk_core::guard::authorize;
use maintdesk_core::identity::IdentityClaim;
use maintdesk_core::roles::{Role, ANY_ROLE};
use maintdesk_core::ticket::TicketSubmission;
use maintdesk_core::types::DbId;
use maintdesk_db::models::ticket::{CreateTicket, Ticket, TicketUpdate};
use maintdesk_events::message::{
    EVENT_TICKET_ASSIGNED, EVENT_TICKET_COMPLETED, EVENT_TICKET_STARTED, EVENT_TICKET_SUBMITTED,
};
use maintdesk_events::PushMessage;

use super::TicketEngine;
use crate::auth::jwt::resolve_role;

impl TicketEngine {
    /// Create an `Open` ticket in the raiser's location.
    pub async fn submit(
        &self,
        claim: &IdentityClaim,
        submission: TicketSubmission,
    ) -> Result<Ticket, CoreError> {
        let claim = authorize(Some(claim), ANY_ROLE)?;
        let valid = submission.validate()?;

        let ticket = self
            .store
            .insert_ticket(&CreateTicket {
                raised_by: claim.subject_id.clone(),
                category: valid.category,
                description: valid.description,
                building_no: valid.building_no,
                area_code: valid.area_code,
                sub_area: valid.sub_area,
                keyword: valid.keyword,
                location: claim.location.clone(),
            })
            .await?;

        tracing::info!(
            ticket_id = ticket.id,
            subject_id = %claim.subject_id,
            location = %ticket.location,
            category = %ticket.category,
            "Ticket submitted"
        );

        self.dispatcher.notify(
            &ticket.raised_by,
            PushMessage::new(
                EVENT_TICKET_SUBMITTED,
                "Ticket submitted",
                format!("Your {} ticket #{} has been received", ticket.category, ticket.id),
            )
            .with_ticket(ticket.id),
        );

        Ok(ticket)
    }

    /// Assign (or re-assign) a ticket to a technician at its location.
    pub async fn assign(
        &self,
        claim: &IdentityClaim,
        ticket_id: DbId,
        technician_id: &str,
    ) -> Result<Ticket, CoreError> {
        let update = TicketUpdate::Assign {
            technician_id: technician_id.to_string(),
            planner_id: claim.subject_id.clone(),
        };
        let ticket = self.apply(claim, ticket_id, update).await?;

        self.dispatcher.notify(
            technician_id,
            PushMessage::new(
                EVENT_TICKET_ASSIGNED,
                "New assignment",
                format!("Ticket #{} at {} has been assigned to you", ticket.id, ticket.location),
            )
            .with_ticket(ticket.id),
        );

        Ok(ticket)
    }

    /// Move an `Assigned` ticket to `InProgress`.
    pub async fn start(&self, claim: &IdentityClaim, ticket_id: DbId) -> Result<Ticket, CoreError> {
        let ticket = self.apply(claim, ticket_id, TicketUpdate::Start).await?;

        self.dispatcher.notify(
            &ticket.raised_by,
            PushMessage::new(
                EVENT_TICKET_STARTED,
                "Work started",
                format!("Work on your ticket #{} has started", ticket.id),
            )
            .with_ticket(ticket.id),
        );

        Ok(ticket)
    }

    /// Move an `InProgress` ticket to `Completed`, recording an optional note.
    pub async fn complete(
        &self,
        claim: &IdentityClaim,
        ticket_id: DbId,
        note: Option<String>,
    ) -> Result<Ticket, CoreError> {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let ticket = self
            .apply(claim, ticket_id, TicketUpdate::Complete { note })
            .await?;

        self.dispatcher.notify(
            &ticket.raised_by,
            PushMessage::new(
                EVENT_TICKET_COMPLETED,
                "Ticket completed",
                format!("Your ticket #{} has been completed", ticket.id),
            )
            .with_ticket(ticket.id),
        );

        Ok(ticket)
    }

    async fn apply(
        &self,
        claim: &IdentityClaim,
        ticket_id: DbId,
        update: TicketUpdate,
    ) -> Result<Ticket, CoreError> {
        let transition = update.transition();
        let claim = authorize(Some(claim), transition.allowed_roles())?;
        let scope = self.scope_for(claim);

        let current = self
            .store
            .find_ticket(ticket_id, &scope)
            .await?
            .ok_or_else(|| CoreError::ticket_not_found(ticket_id))?;
        let status = current.status()?;
        if !transition.permits(status) {
            tracing::info!(
                ticket_id,
                transition = transition.name(),
                status = %status,
                "Ticket not in a state the transition applies to"
            );
            return Err(CoreError::ticket_not_found(ticket_id));
        }

        if let TicketUpdate::Assign { technician_id, .. } = &update {
            self.check_assignee(technician_id, &current.location).await?;
        }

        let updated = self
            .store
            .update_ticket(ticket_id, &update, &scope)
            .await?
            .ok_or_else(|| {
                tracing::info!(
                    ticket_id,
                    transition = transition.name(),
                    "Conditional update affected no rows"
                );
                CoreError::ticket_not_found(ticket_id)
            })?;

        tracing::info!(
            ticket_id,
            subject_id = %claim.subject_id,
            transition = transition.name(),
            status = %updated.status,
            "Ticket transitioned"
        );
        Ok(updated)
    }

    async fn check_assignee(&self, technician_id: &str, location: &str) -> Result<(), CoreError> {
        let eligible = self
            .store
            .find_user(technician_id)
            .await?
            .is_some_and(|user| {
                resolve_role(&user.role) == Some(Role::Technician) && user.location == location
            });

        if eligible {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "'{technician_id}' is not a technician at {location}"
            )))
        }
    }
}
