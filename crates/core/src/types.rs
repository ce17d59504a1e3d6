/// Ticket primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque, stable user identifier carried in every identity claim.
pub type SubjectId = String;
