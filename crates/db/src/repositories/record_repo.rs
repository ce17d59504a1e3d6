//! Repository for the `breakdown_records` and `safety_records` tables.

use maintdesk_core::guard::LocationScope;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::record::{FacilityRecord, RecordKind};
use crate::scope::scope_to_location;

const COLUMNS: &str = "id, location, summary, details, recorded_at";

pub struct RecordRepo;

impl RecordRepo {
    /// List records of `kind` within `scope`, most recent first.
    pub async fn list(
        pool: &PgPool,
        kind: RecordKind,
        scope: &LocationScope,
    ) -> Result<Vec<FacilityRecord>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM {} WHERE TRUE",
            kind.table()
        ));
        scope_to_location(&mut qb, scope);
        qb.push(" ORDER BY recorded_at DESC, id DESC");
        qb.build_query_as::<FacilityRecord>().fetch_all(pool).await
    }
}
