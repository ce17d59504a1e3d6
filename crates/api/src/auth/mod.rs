//! Authentication primitives.
//!
//! - [`jwt`] -- the identity token codec (issue / verify, role alias resolution).
//! - [`password`] -- Argon2id verification used by login.

pub mod jwt;
pub mod password;
