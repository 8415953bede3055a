//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The pipeline calls store methods (directly or through the collaborator
//! traits) and never executes SQL itself.

use crate::error::ReportResult;
use rusqlite::Connection;

mod report;
mod ride;
mod rider;

pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    pub fn open(path: &str) -> ReportResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReportResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ReportResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_rides.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_fraud_reports.sql"))?;
        Ok(())
    }
}
