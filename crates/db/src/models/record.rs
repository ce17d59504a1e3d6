//! Breakdown and safety log records.

use maintdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Which record table to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Breakdown,
    Safety,
}

impl RecordKind {
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Breakdown => "breakdown_records",
            RecordKind::Safety => "safety_records",
        }
    }
}

/// One row from `breakdown_records` or `safety_records`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct FacilityRecord {
    pub id: DbId,
    pub location: String,
    pub summary: String,
    pub details: Option<String>,
    pub recorded_at: Timestamp,
}
