//! Well-known role names and the [`Role`] enum used at the claim boundary.
//!
//! The canonical names must match the `role` values seeded into the `users`
//! table. Legacy aliases are resolved by the identity token codec, never here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_NORMAL_USER: &str = "normal_user";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_PLANNER: &str = "planner";
pub const ROLE_ADMIN: &str = "admin";

/// The role carried by an identity claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    NormalUser,
    Technician,
    Planner,
    Admin,
}

/// Every role; anyone authenticated may raise a ticket.
pub const ANY_ROLE: &[Role] = &[Role::NormalUser, Role::Technician, Role::Planner, Role::Admin];

/// Roles allowed to assign a ticket to a technician.
pub const ASSIGNER_ROLES: &[Role] = &[Role::Planner, Role::Admin];

/// Roles allowed to start or complete work on a ticket.
pub const WORKER_ROLES: &[Role] = &[Role::Technician, Role::Planner, Role::Admin];

impl Role {
    /// Canonical role name as stored in the database and embedded in tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::NormalUser => ROLE_NORMAL_USER,
            Role::Technician => ROLE_TECHNICIAN,
            Role::Planner => ROLE_PLANNER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Planners and admins see every ticket in their location, not just
    /// the ones they raised or were assigned.
    pub fn oversees_location(self) -> bool {
        matches!(self, Role::Planner | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Strict parse of a canonical role name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_NORMAL_USER => Ok(Role::NormalUser),
            ROLE_TECHNICIAN => Ok(Role::Technician),
            ROLE_PLANNER => Ok(Role::Planner),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}
