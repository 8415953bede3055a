//! Report assembly — findings in, persisted-shape report out.

use crate::{
    config::DirectoryConfig,
    directory::{resolve_names, RiderDirectory},
    error::ReportResult,
    scan::FraudFindings,
    types::{ReportId, RiderId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated fraud report. The three rider vectors are parallel:
/// entry `i` of each describes the same flagged rider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FraudReport {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub window_label: String,
    pub rider_names: Vec<String>,
    pub rider_ids: Vec<RiderId>,
    pub remarks: Vec<String>,
}

impl FraudReport {
    pub fn len(&self) -> usize {
        self.rider_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rider_ids.is_empty()
    }

    /// `(name, rider_id, remark)` rows in report order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.rider_names
            .iter()
            .zip(&self.rider_ids)
            .zip(&self.remarks)
            .map(|((n, id), r)| (n.as_str(), id.as_str(), r.as_str()))
    }
}

/// Summary row used when listing reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub window_label: String,
    pub flagged_count: usize,
}

/// Enrich findings with display names and lay them out as parallel vectors.
/// A directory failure aborts assembly; no partial report is produced.
pub fn assemble_report<D: RiderDirectory + ?Sized>(
    findings: &FraudFindings,
    directory: &D,
    config: &DirectoryConfig,
    window_label: &str,
    generated_at: DateTime<Utc>,
) -> ReportResult<FraudReport> {
    let rider_ids: Vec<RiderId> = findings.rider_ids().to_vec();
    let rider_names = resolve_names(directory, &rider_ids, config)?;
    let remarks = findings
        .iter()
        .map(|(_, labels)| labels.join(", "))
        .collect();

    Ok(FraudReport {
        report_id: format!("rpt-{}", uuid::Uuid::new_v4()),
        generated_at,
        window_label: window_label.to_string(),
        rider_names,
        rider_ids,
        remarks,
    })
}
