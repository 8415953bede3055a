//! RideWatch core: detects riders who boarded overlapping bus rides and
//! turns those findings into persisted fraud reports.
//!
//! Pipeline, in order:
//!   1. `ride`      : validate stored ride documents into eligible rides
//!   2. `grouping`  : greedy clustering of overlapping / proximate rides
//!   3. `scan`      : roster reconciliation inside each group
//!   4. `report`    : name enrichment and parallel-array assembly
//!   5. `generator` : orchestration against the collaborator traits
//!
//! RULE: Only `store` talks to the database.

pub mod config;
pub mod directory;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod report;
pub mod ride;
pub mod scan;
pub mod store;
pub mod types;
pub mod window;
