use super::ReportStore;
use crate::{
    config::DIRECTORY_BATCH_LIMIT,
    directory::RiderDirectory,
    error::{ReportError, ReportResult},
    types::RiderId,
};
use rusqlite::params;
use std::collections::HashMap;

impl ReportStore {
    // ── Rider directory ────────────────────────────────────────────

    pub fn upsert_rider(&self, rider_id: &str, name: &str) -> ReportResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO rider (rider_id, name) VALUES (?1, ?2)",
            params![rider_id, name],
        )?;
        Ok(())
    }

    /// One `IN (...)` query. Refuses batches above the directory limit.
    pub fn rider_names(&self, rider_ids: &[RiderId]) -> ReportResult<HashMap<RiderId, String>> {
        if rider_ids.len() > DIRECTORY_BATCH_LIMIT {
            return Err(ReportError::BatchTooLarge {
                size: rider_ids.len(),
                limit: DIRECTORY_BATCH_LIMIT,
            });
        }
        if rider_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = (1..=rider_ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT rider_id, name FROM rider WHERE rider_id IN ({placeholders})");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(rider_ids.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(rows)
    }
}

impl RiderDirectory for ReportStore {
    fn lookup_names(&self, rider_ids: &[RiderId]) -> ReportResult<HashMap<RiderId, String>> {
        self.rider_names(rider_ids)
            .map_err(|e| ReportError::DirectoryLookup { reason: e.to_string() })
    }
}
