//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Verifies the request's credential (header, then cookie).
//! - [`rbac::RequirePlanner`] -- Requires the `planner` or `admin` role.

pub mod auth;
pub mod rbac;
