//! Domain types and pure rules for the maintenance ticket service.
//!
//! Nothing in this crate touches the database, the network, or the clock
//! beyond reading timestamps handed to it.

pub mod error;
pub mod guard;
pub mod identity;
pub mod roles;
pub mod ticket;
pub mod types;
