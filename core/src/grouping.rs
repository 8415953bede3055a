//! Interval grouping — clusters rides that ran at the same time.
//!
//! INVARIANT: clustering is greedy and single-pass.
//! A ride joins the FIRST existing group (in creation order) containing a
//! member it overlaps or is proximate to. Groups are never merged later, so
//! a ride bridging two earlier groups only lands in the first of them.
//! Remark text depends on exact membership; do not turn this into a
//! transitive closure.

use crate::{
    config::GroupingConfig,
    error::{ReportError, ReportResult},
    ride::EligibleRide,
};
use chrono::{DateTime, Duration, Utc};

/// Rides that ran concurrently (or nearly so), ordered by start time.
#[derive(Debug, Clone, PartialEq)]
pub struct RideGroup {
    rides: Vec<EligibleRide>,
}

impl RideGroup {
    fn new(first: EligibleRide) -> Self {
        Self { rides: vec![first] }
    }

    /// The earliest-starting ride of the group.
    pub fn base(&self) -> &EligibleRide {
        &self.rides[0]
    }

    pub fn rides(&self) -> &[EligibleRide] {
        &self.rides
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn ride_ids(&self) -> Vec<&str> {
        self.rides.iter().map(|r| r.ride_id.as_str()).collect()
    }
}

/// Closed-interval overlap: touching endpoints count.
pub fn overlaps(a: &EligibleRide, b: &EligibleRide) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Starts or ends within `threshold` of each other.
pub fn proximate(a: &EligibleRide, b: &EligibleRide, threshold: Duration) -> bool {
    gap(a.start, b.start) <= threshold || gap(a.end, b.end) <= threshold
}

fn gap(x: DateTime<Utc>, y: DateTime<Utc>) -> Duration {
    if x >= y { x - y } else { y - x }
}

fn related(a: &EligibleRide, b: &EligibleRide, threshold: Duration) -> bool {
    overlaps(a, b) || (threshold > Duration::zero() && proximate(a, b, threshold))
}

/// Partition rides into groups. Input order does not matter; rides are
/// sorted by start (stable, so equal starts keep input order).
/// Fails only when the proximity threshold is out of range.
pub fn group_rides(
    mut rides: Vec<EligibleRide>,
    config: &GroupingConfig,
) -> ReportResult<Vec<RideGroup>> {
    config.validate()?;
    let threshold = Duration::try_minutes(config.proximity_minutes).ok_or_else(|| {
        ReportError::InvalidConfig {
            reason: format!("proximity_minutes {} is not a valid duration", config.proximity_minutes),
        }
    })?;
    rides.sort_by_key(|r| r.start);

    let mut groups: Vec<RideGroup> = Vec::new();
    for ride in rides {
        let target = groups
            .iter()
            .position(|g| g.rides.iter().any(|member| related(&ride, member, threshold)));
        match target {
            Some(idx) => groups[idx].rides.push(ride),
            None => groups.push(RideGroup::new(ride)),
        }
    }

    log::debug!(
        "grouping: {} groups, {} with concurrent rides (proximity {}m)",
        groups.len(),
        groups.iter().filter(|g| g.len() > 1).count(),
        config.proximity_minutes,
    );
    Ok(groups)
}
