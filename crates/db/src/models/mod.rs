pub mod record;
pub mod ticket;
pub mod user;
