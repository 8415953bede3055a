//! Report windows — the time filter a report was generated for.

use crate::error::{ReportError, ReportResult};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportWindow {
    Last24Hours,
    Last7Days,
    Last30Days,
    AllTime,
    Since(DateTime<Utc>),
}

impl ReportWindow {
    /// Earliest ride start included in this window, relative to `now`.
    /// `None` means unbounded.
    pub fn lower_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ReportWindow::Last24Hours => Some(now - Duration::hours(24)),
            ReportWindow::Last7Days   => Some(now - Duration::days(7)),
            ReportWindow::Last30Days  => Some(now - Duration::days(30)),
            ReportWindow::AllTime     => None,
            ReportWindow::Since(t)    => Some(*t),
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWindow::Last24Hours => write!(f, "last_24_hours"),
            ReportWindow::Last7Days   => write!(f, "last_7_days"),
            ReportWindow::Last30Days  => write!(f, "last_30_days"),
            ReportWindow::AllTime     => write!(f, "all_time"),
            ReportWindow::Since(t)    => write!(f, "since:{}", t.to_rfc3339()),
        }
    }
}

impl FromStr for ReportWindow {
    type Err = ReportError;

    fn from_str(s: &str) -> ReportResult<Self> {
        let s = s.trim();
        match s {
            "last_24_hours" => return Ok(ReportWindow::Last24Hours),
            "last_7_days"   => return Ok(ReportWindow::Last7Days),
            "last_30_days"  => return Ok(ReportWindow::Last30Days),
            "all_time"      => return Ok(ReportWindow::AllTime),
            _ => {}
        }
        s.strip_prefix("since:")
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| ReportWindow::Since(t.with_timezone(&Utc)))
            .ok_or_else(|| ReportError::InvalidWindow { label: s.to_string() })
    }
}
