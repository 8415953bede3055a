use super::ReportStore;
use crate::{
    error::ReportResult,
    generator::RideSource,
    ride::{RideRecord, RideStatus},
};
use chrono::{DateTime, Utc};
use rusqlite::params;

// Helper function for mapping ride rows
fn ride_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<(RideRecord, String, String)> {
    let status: String = row.get(3)?;
    Ok((
        RideRecord {
            ride_id: row.get(0)?,
            start: row.get(1)?,
            end: row.get(2)?,
            status: RideStatus::parse(&status),
            offline_riders: Vec::new(),
            online_riders: Vec::new(),
            bus_name: row.get(6)?,
            route_name: row.get(7)?,
        },
        row.get(4)?,
        row.get(5)?,
    ))
}

/// Full-precision sort and filter key for a ride start. Instants outside
/// the i64 nanosecond range (before 1677 or after 2262) saturate.
fn start_key(t: DateTime<Utc>) -> i64 {
    t.timestamp_nanos_opt()
        .unwrap_or(if t.timestamp() < 0 { i64::MIN } else { i64::MAX })
}

impl ReportStore {
    // ── Ride ───────────────────────────────────────────────────────

    /// Insert or replace a ride document as the tracker would write it.
    pub fn upsert_ride(&self, ride: &RideRecord) -> ReportResult<()> {
        let start_nanos = ride
            .start
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|t| start_key(t.with_timezone(&Utc)));
        self.conn.execute(
            "INSERT OR REPLACE INTO ride (
                ride_id, start_raw, end_raw, start_nanos, status,
                offline_riders, online_riders, bus_name, route_name
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &ride.ride_id,
                ride.start.as_deref(),
                ride.end.as_deref(),
                start_nanos,
                ride.status.as_str(),
                serde_json::to_string(&ride.offline_riders)?,
                serde_json::to_string(&ride.online_riders)?,
                &ride.bus_name,
                &ride.route_name,
            ],
        )?;
        Ok(())
    }

    /// Completed rides, optionally only those starting at or after `since`.
    /// Rides whose start never parsed are only returned by unbounded queries.
    pub fn completed_rides_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> ReportResult<Vec<RideRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT ride_id, start_raw, end_raw, status, offline_riders, online_riders,
                    bus_name, route_name
             FROM ride
             WHERE status = 'completed' AND (?1 IS NULL OR start_nanos >= ?1)
             ORDER BY start_nanos ASC, ride_id ASC",
        )?;
        let rows = stmt
            .query_map(params![since.map(start_key)], ride_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rides = Vec::with_capacity(rows.len());
        for (mut ride, offline, online) in rows {
            ride.offline_riders = serde_json::from_str(&offline)?;
            ride.online_riders = serde_json::from_str(&online)?;
            rides.push(ride);
        }
        Ok(rides)
    }

    pub fn ride_count(&self) -> ReportResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ride", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl RideSource for ReportStore {
    fn completed_rides(&self, since: Option<DateTime<Utc>>) -> ReportResult<Vec<RideRecord>> {
        self.completed_rides_since(since)
    }
}
