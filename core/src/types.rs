//! Shared primitive types used across the report pipeline.

/// Identifier of a ride document.
pub type RideId = String;

/// Identifier of a rider (student) in the rider directory.
pub type RiderId = String;

/// Identifier of a persisted fraud report.
pub type ReportId = String;
