//! Fraud detection scan — roster reconciliation inside ride groups.
//!
//! Checks, per group of two or more rides:
//!   1. Offline duplication: a rider on the offline roster of more than one
//!      ride is flagged, citing every ride that lists them offline.
//!   2. Online/offline cross-check: for every ordered pair (A, B) of distinct
//!      rides, a rider on A's online roster and B's offline roster is
//!      flagged, citing A then B.
//!
//! The scan is symmetric over the group; it does not anchor on the base ride.

use crate::{grouping::RideGroup, types::RiderId};
use std::collections::HashMap;

/// Flagged riders and the distinct ride labels implicating each of them.
/// Iteration order is first-flag order; label order is first-cited order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FraudFindings {
    order: Vec<RiderId>,
    labels: HashMap<RiderId, Vec<String>>,
}

impl FraudFindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rider_id` is implicated by `labels`. Labels already
    /// cited for this rider are skipped.
    pub fn flag<'a>(&mut self, rider_id: &str, labels: impl IntoIterator<Item = &'a str>) {
        if !self.labels.contains_key(rider_id) {
            self.order.push(rider_id.to_string());
        }
        let cited = self.labels.entry(rider_id.to_string()).or_default();
        for label in labels {
            if !cited.iter().any(|c| c == label) {
                cited.push(label.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, rider_id: &str) -> bool {
        self.labels.contains_key(rider_id)
    }

    pub fn rider_ids(&self) -> &[RiderId] {
        &self.order
    }

    pub fn labels_for(&self, rider_id: &str) -> Option<&[String]> {
        self.labels.get(rider_id).map(Vec::as_slice)
    }

    /// Display text for a rider: cited labels joined with ", ".
    pub fn remark_for(&self, rider_id: &str) -> Option<String> {
        self.labels_for(rider_id).map(|labels| labels.join(", "))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RiderId, &[String])> {
        self.order
            .iter()
            .map(move |id| (id, self.labels[id].as_slice()))
    }
}

/// Scan every group and merge the results.
pub fn scan_groups(groups: &[RideGroup]) -> FraudFindings {
    let mut findings = FraudFindings::new();
    for group in groups {
        scan_group(group, &mut findings);
    }
    findings
}

/// Scan a single group, adding to `findings`. Groups of one ride are clean.
pub fn scan_group(group: &RideGroup, findings: &mut FraudFindings) {
    if group.len() < 2 {
        return;
    }
    let rides = group.rides();
    log::debug!(
        "scan: group of {} anchored at ride {} ({})",
        rides.len(),
        group.base().ride_id,
        group.base().label,
    );

    // 1. Offline duplication.
    let mut seen: Vec<&str> = Vec::new();
    for ride in rides {
        for rider in &ride.offline_riders {
            if seen.contains(&rider.as_str()) {
                continue;
            }
            seen.push(rider);

            let holders: Vec<&str> = rides
                .iter()
                .filter(|r| r.has_offline(rider))
                .map(|r| r.label.as_str())
                .collect();
            if holders.len() > 1 {
                findings.flag(rider, holders);
            }
        }
    }

    // 2. Online on one ride, offline on another.
    for (i, a) in rides.iter().enumerate() {
        for (j, b) in rides.iter().enumerate() {
            if i == j {
                continue;
            }
            for rider in &a.online_riders {
                if b.has_offline(rider) {
                    findings.flag(rider, [a.label.as_str(), b.label.as_str()]);
                }
            }
        }
    }
}
