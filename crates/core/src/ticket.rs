//! Ticket lifecycle states, categories, and submission validation.
//!
//! The lifecycle is strictly linear:
//!
//! ```text
//! Open -> Assigned -> InProgress -> Completed
//! ```
//!
//! There are no backward transitions and no cancellation state. The only
//! self-transition is re-assignment (`Assigned -> Assigned`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{Role, ASSIGNER_ROLES, WORKER_ROLES};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_OPEN: &str = "Open";
pub const STATUS_ASSIGNED: &str = "Assigned";
pub const STATUS_IN_PROGRESS: &str = "InProgress";
pub const STATUS_COMPLETED: &str = "Completed";

/// Ticket lifecycle status. Ordering follows lifecycle progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Assigned,
    InProgress,
    Completed,
}

impl TicketStatus {
    /// Name stored in the `tickets.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => STATUS_OPEN,
            TicketStatus::Assigned => STATUS_ASSIGNED,
            TicketStatus::InProgress => STATUS_IN_PROGRESS,
            TicketStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_OPEN => Ok(TicketStatus::Open),
            STATUS_ASSIGNED => Ok(TicketStatus::Assigned),
            STATUS_IN_PROGRESS => Ok(TicketStatus::InProgress),
            STATUS_COMPLETED => Ok(TicketStatus::Completed),
            other => Err(format!("Unknown ticket status '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// What kind of problem a ticket reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TicketCategory {
    FacilityService,
    Breakdown,
    Safety,
    #[default]
    Other,
}

impl TicketCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketCategory::FacilityService => "FacilityService",
            TicketCategory::Breakdown => "Breakdown",
            TicketCategory::Safety => "Safety",
            TicketCategory::Other => "Other",
        }
    }

    /// Coerce a client-supplied category into a known one.
    ///
    /// Matching is case-insensitive. `"Facility"` is accepted for
    /// [`TicketCategory::FacilityService`]; anything absent or unrecognized
    /// becomes [`TicketCategory::Other`].
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return TicketCategory::Other;
        };
        match raw.to_ascii_lowercase().as_str() {
            "facilityservice" | "facility_service" | "facility" => TicketCategory::FacilityService,
            "breakdown" => TicketCategory::Breakdown,
            "safety" => TicketCategory::Safety,
            _ => TicketCategory::Other,
        }
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Raw ticket submission as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketSubmission {
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
}

/// A submission whose category has been normalized and whose
/// location-specific fields satisfy the category's requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub category: TicketCategory,
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
}

impl TicketSubmission {
    /// Normalize the category and enforce the facility-service field rule.
    ///
    /// `FacilityService` tickets must carry a non-blank `building_no`,
    /// `area_code`, `sub_area`, and `keyword`. Other categories keep whatever
    /// non-blank values were supplied.
    pub fn validate(self) -> Result<ValidatedSubmission, CoreError> {
        let category = TicketCategory::normalize(self.category.as_deref());

        let building_no = non_blank(self.building_no);
        let area_code = non_blank(self.area_code);
        let sub_area = non_blank(self.sub_area);
        let keyword = non_blank(self.keyword);

        if category == TicketCategory::FacilityService {
            let missing: Vec<&str> = [
                ("building_no", &building_no),
                ("area_code", &area_code),
                ("sub_area", &sub_area),
                ("keyword", &keyword),
            ]
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

            if !missing.is_empty() {
                return Err(CoreError::Validation(format!(
                    "FacilityService tickets require: {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(ValidatedSubmission {
            category,
            description: self.description.trim().to_string(),
            building_no,
            area_code,
            sub_area,
            keyword,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A guarded status change applied to an existing ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Assign,
    Start,
    Complete,
}

impl Transition {
    pub fn name(self) -> &'static str {
        match self {
            Transition::Assign => "assign",
            Transition::Start => "start",
            Transition::Complete => "complete",
        }
    }

    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Transition::Assign => ASSIGNER_ROLES,
            Transition::Start | Transition::Complete => WORKER_ROLES,
        }
    }

    /// Statuses the ticket must currently be in for the transition to apply.
    pub fn from_statuses(self) -> &'static [TicketStatus] {
        match self {
            Transition::Assign => &[TicketStatus::Open, TicketStatus::Assigned],
            Transition::Start => &[TicketStatus::Assigned],
            Transition::Complete => &[TicketStatus::InProgress],
        }
    }

    pub fn target(self) -> TicketStatus {
        match self {
            Transition::Assign => TicketStatus::Assigned,
            Transition::Start => TicketStatus::InProgress,
            Transition::Complete => TicketStatus::Completed,
        }
    }

    /// Whether the transition may fire from `current`.
    pub fn permits(self, current: TicketStatus) -> bool {
        self.from_statuses().contains(&current)
    }
}
