//! Repository layer: one zero-sized struct per table with async query methods.

pub mod record_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use record_repo::RecordRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
