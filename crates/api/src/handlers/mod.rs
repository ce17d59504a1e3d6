pub mod auth;
pub mod directory;
pub mod push;
pub mod tickets;
