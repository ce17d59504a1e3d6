//! The verified identity of a caller.

use serde::Serialize;

use crate::roles::Role;
use crate::types::{SubjectId, Timestamp};

/// Decoded, verified representation of who is calling.
///
/// Produced only by the identity token codec; immutable once issued and
/// re-derived at each login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    pub subject_id: SubjectId,
    pub display_name: String,
    pub role: Role,
    pub location: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl IdentityClaim {
    /// True when this claim belongs to an admin stationed at `hq_location`.
    pub fn is_headquarters_admin(&self, hq_location: &str) -> bool {
        self.role == Role::Admin && self.location == hq_location
    }
}
