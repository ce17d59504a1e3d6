//! Role and location authorization checks.
//!
//! Everything here is pure and stateless: decisions are recomputed from the
//! identity claim on every request and never cached.
//!
//! The one role/location interaction exception is the headquarters override:
//! an admin whose location equals the configured headquarters location is not
//! location-scoped at all. [`LocationScope::for_claim`] is the only place that
//! decides this, and every listing or lookup goes through it.

use crate::error::CoreError;
use crate::identity::IdentityClaim;
use crate::roles::Role;

/// Check that a caller is authenticated and holds one of `required` roles.
///
/// Returns the claim back on success so callers can chain on it.
pub fn authorize<'a>(
    claim: Option<&'a IdentityClaim>,
    required: &[Role],
) -> Result<&'a IdentityClaim, CoreError> {
    let claim =
        claim.ok_or_else(|| CoreError::Unauthenticated("Authentication required".into()))?;

    if !required.contains(&claim.role) {
        return Err(CoreError::Forbidden(format!(
            "Role '{}' is not permitted to perform this action",
            claim.role
        )));
    }

    Ok(claim)
}

/// The location filter applied to a listing or lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationScope {
    /// No filter: headquarters admins see every location.
    Global,
    /// Only rows whose `location` equals the contained value.
    Location(String),
}

impl LocationScope {
    /// Derive the scope for a caller.
    pub fn for_claim(claim: &IdentityClaim, hq_location: &str) -> Self {
        if claim.is_headquarters_admin(hq_location) {
            LocationScope::Global
        } else {
            LocationScope::Location(claim.location.clone())
        }
    }

    /// Whether a row stored under `location` falls inside this scope.
    pub fn permits(&self, location: &str) -> bool {
        match self {
            LocationScope::Global => true,
            LocationScope::Location(scoped) => scoped == location,
        }
    }

    /// The location equality filter, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            LocationScope::Global => None,
            LocationScope::Location(scoped) => Some(scoped),
        }
    }
}

/// The ticket fields that decide visibility.
#[derive(Debug, Clone, Copy)]
pub struct TicketAccess<'a> {
    pub location: &'a str,
    pub raised_by: &'a str,
    pub assigned_to: Option<&'a str>,
}

/// Whether `claim` may see a ticket.
///
/// Headquarters admins see everything. Anyone else must share the ticket's
/// location and either be directly involved (raiser or assignee) or oversee
/// the location (planner or admin).
pub fn can_view_ticket(claim: &IdentityClaim, hq_location: &str, ticket: TicketAccess<'_>) -> bool {
    if claim.is_headquarters_admin(hq_location) {
        return true;
    }
    if claim.location != ticket.location {
        return false;
    }
    claim.role.oversees_location()
        || claim.subject_id == ticket.raised_by
        || ticket.assigned_to == Some(claim.subject_id.as_str())
}
