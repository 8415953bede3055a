//! Report generator — one administrator-triggered run, start to finish.
//!
//! ORDER (fixed):
//!   1. Fetch completed rides for the window   (RideSource)
//!   2. Validate; drop malformed documents
//!   3. Group overlapping rides
//!   4. Scan groups for roster conflicts
//!   5. Resolve names                          (RiderDirectory)
//!   6. Persist                                (ReportSink)
//!
//! Nothing is written unless every earlier step succeeded.

use crate::{
    config::ReportConfig,
    directory::RiderDirectory,
    error::ReportResult,
    grouping::group_rides,
    report::{assemble_report, FraudReport},
    ride::{eligible_rides, RideRecord},
    scan::scan_groups,
    window::ReportWindow,
};
use chrono::{DateTime, Utc};

/// Completed rides, optionally bounded below by start time.
pub trait RideSource {
    fn completed_rides(&self, since: Option<DateTime<Utc>>) -> ReportResult<Vec<RideRecord>>;
}

/// Append-only destination for generated reports.
pub trait ReportSink {
    fn save_report(&self, report: &FraudReport) -> ReportResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// No eligible completed ride started inside the window.
    NoCompletedRides { window_label: String },
    /// Rides were analysed and nobody was flagged. No report was written.
    NoFraudDetected { window_label: String, rides_analysed: usize },
    Generated(FraudReport),
}

impl ReportOutcome {
    pub fn message(&self) -> String {
        match self {
            ReportOutcome::NoCompletedRides { window_label } => {
                format!("No completed rides in period ({window_label})")
            }
            ReportOutcome::NoFraudDetected { window_label, rides_analysed } => {
                format!("No fraudulent activity detected across {rides_analysed} rides ({window_label})")
            }
            ReportOutcome::Generated(report) => format!(
                "Report {} generated: {} flagged riders ({})",
                report.report_id,
                report.len(),
                report.window_label
            ),
        }
    }

    pub fn report(&self) -> Option<&FraudReport> {
        match self {
            ReportOutcome::Generated(report) => Some(report),
            _ => None,
        }
    }
}

pub struct ReportGenerator<'a> {
    rides: &'a dyn RideSource,
    directory: &'a dyn RiderDirectory,
    sink: &'a dyn ReportSink,
    config: ReportConfig,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(
        rides: &'a dyn RideSource,
        directory: &'a dyn RiderDirectory,
        sink: &'a dyn ReportSink,
        config: ReportConfig,
    ) -> Self {
        Self { rides, directory, sink, config }
    }

    /// Run the full pipeline for `window`, treating `now` as the current time.
    /// An invalid config fails the run before any ride is read.
    pub fn generate(&self, window: &ReportWindow, now: DateTime<Utc>) -> ReportResult<ReportOutcome> {
        self.config.validate()?;
        let window_label = window.label();

        let records = self.rides.completed_rides(window.lower_bound(now))?;
        let (eligible, dropped) = eligible_rides(&records);
        if dropped > 0 {
            log::debug!("generator: skipped {dropped} ride documents without a usable interval");
        }
        if eligible.is_empty() {
            log::info!("generator: no completed rides for {window_label}");
            return Ok(ReportOutcome::NoCompletedRides { window_label });
        }

        let rides_analysed = eligible.len();
        let groups = group_rides(eligible, &self.config.grouping)?;
        let findings = scan_groups(&groups);
        if findings.is_empty() {
            log::info!("generator: {rides_analysed} rides clean for {window_label}");
            return Ok(ReportOutcome::NoFraudDetected { window_label, rides_analysed });
        }

        let report = assemble_report(
            &findings,
            self.directory,
            &self.config.directory,
            &window_label,
            now,
        )?;
        self.sink.save_report(&report)?;

        log::info!(
            "generator: report {} flagged {} riders across {} groups ({window_label})",
            report.report_id,
            report.len(),
            groups.len(),
        );
        Ok(ReportOutcome::Generated(report))
    }
}
