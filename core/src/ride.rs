//! Ride documents and their validated, analysable form.
//!
//! RULE: Grouping and scanning only ever see `EligibleRide`.
//! Stored documents are checked once, here, at the boundary.

use crate::types::{RideId, RiderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Scheduled => "scheduled",
            RideStatus::Ongoing   => "ongoing",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
            RideStatus::Unknown   => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "scheduled" => RideStatus::Scheduled,
            "ongoing"   => RideStatus::Ongoing,
            "completed" => RideStatus::Completed,
            "cancelled" => RideStatus::Cancelled,
            _           => RideStatus::Unknown,
        }
    }
}

/// A ride as stored by the ride-tracking system. Timestamps are kept as the
/// raw strings the tracker wrote; they may be missing or garbage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideRecord {
    pub ride_id: RideId,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    pub status: RideStatus,
    #[serde(default)]
    pub offline_riders: Vec<RiderId>,
    #[serde(default)]
    pub online_riders: Vec<RiderId>,
    pub bus_name: String,
    pub route_name: String,
}

impl RideRecord {
    /// Returns `None` when the ride cannot take part in fraud analysis:
    /// not completed, a missing or unparseable timestamp, or an end before
    /// its start.
    pub fn validate(&self) -> Option<EligibleRide> {
        if self.status != RideStatus::Completed {
            return None;
        }
        let start = parse_instant(self.start.as_deref()?)?;
        let end = parse_instant(self.end.as_deref()?)?;
        if end < start {
            return None;
        }
        Some(EligibleRide {
            ride_id: self.ride_id.clone(),
            start,
            end,
            offline_riders: unique_in_order(&self.offline_riders),
            online_riders: unique_in_order(&self.online_riders),
            label: ride_label(&self.bus_name, &self.route_name),
        })
    }
}

/// A completed ride with a well-formed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleRide {
    pub ride_id: RideId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub offline_riders: Vec<RiderId>,
    pub online_riders: Vec<RiderId>,
    /// Human-readable "<bus> - <route>" text cited in remarks.
    pub label: String,
}

impl EligibleRide {
    pub fn has_offline(&self, rider_id: &str) -> bool {
        self.offline_riders.iter().any(|r| r == rider_id)
    }

    pub fn has_online(&self, rider_id: &str) -> bool {
        self.online_riders.iter().any(|r| r == rider_id)
    }
}

/// Validate a batch of stored rides. Returns the eligible rides (input order
/// preserved) and the number of documents that were dropped.
pub fn eligible_rides(records: &[RideRecord]) -> (Vec<EligibleRide>, usize) {
    let eligible: Vec<EligibleRide> = records.iter().filter_map(RideRecord::validate).collect();
    let dropped = records.len() - eligible.len();
    (eligible, dropped)
}

pub fn ride_label(bus_name: &str, route_name: &str) -> String {
    format!("{bus_name} - {route_name}")
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn unique_in_order(ids: &[RiderId]) -> Vec<RiderId> {
    let mut out: Vec<RiderId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !id.is_empty() && !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}
