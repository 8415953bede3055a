use super::ReportStore;
use crate::{
    error::{ReportError, ReportResult},
    generator::ReportSink,
    report::{FraudReport, ReportSummary},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

fn parse_generated_at(raw: &str) -> ReportResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ReportError::Other(anyhow::anyhow!("bad generated_at '{raw}': {e}")))
}

impl ReportStore {
    // ── Fraud report ───────────────────────────────────────────────

    pub fn insert_report(&self, report: &FraudReport) -> ReportResult<()> {
        self.conn.execute(
            "INSERT INTO fraud_report (
                report_id, generated_at, window_label, rider_names, rider_ids, remarks,
                flagged_count
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &report.report_id,
                report.generated_at.to_rfc3339(),
                &report.window_label,
                serde_json::to_string(&report.rider_names)?,
                serde_json::to_string(&report.rider_ids)?,
                serde_json::to_string(&report.remarks)?,
                report.len() as i64,
            ],
        )?;
        Ok(())
    }

    pub fn get_report(&self, report_id: &str) -> ReportResult<FraudReport> {
        let row = self
            .conn
            .query_row(
                "SELECT report_id, generated_at, window_label, rider_names, rider_ids, remarks
                 FROM fraud_report WHERE report_id = ?1",
                params![report_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;
        let Some((report_id, generated_at, window_label, names, ids, remarks)) = row else {
            return Err(ReportError::ReportNotFound {
                report_id: report_id.to_string(),
            });
        };
        Ok(FraudReport {
            report_id,
            generated_at: parse_generated_at(&generated_at)?,
            window_label,
            rider_names: serde_json::from_str(&names)?,
            rider_ids: serde_json::from_str(&ids)?,
            remarks: serde_json::from_str(&remarks)?,
        })
    }

    /// Newest first.
    pub fn list_reports(&self) -> ReportResult<Vec<ReportSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT report_id, generated_at, window_label, flagged_count
             FROM fraud_report ORDER BY generated_at DESC, report_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(report_id, generated_at, window_label, flagged)| -> ReportResult<ReportSummary> {
                Ok(ReportSummary {
                    report_id,
                    generated_at: parse_generated_at(&generated_at)?,
                    window_label,
                    flagged_count: flagged as usize,
                })
            })
            .collect()
    }

    pub fn delete_report(&self, report_id: &str) -> ReportResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM fraud_report WHERE report_id = ?1",
            params![report_id],
        )?;
        if deleted == 0 {
            return Err(ReportError::ReportNotFound {
                report_id: report_id.to_string(),
            });
        }
        Ok(())
    }

    /// Bulk delete. Returns the number of reports removed.
    pub fn delete_all_reports(&self) -> ReportResult<usize> {
        let deleted = self.conn.execute("DELETE FROM fraud_report", [])?;
        Ok(deleted)
    }

    pub fn report_count(&self) -> ReportResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM fraud_report", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ReportSink for ReportStore {
    fn save_report(&self, report: &FraudReport) -> ReportResult<()> {
        self.insert_report(report)
    }
}
