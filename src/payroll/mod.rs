//! Payroll and attendance aggregation over in-memory snapshots.
//!
//! Nothing in here performs I/O; handlers fetch the collections first and
//! hand them over as slices.

pub mod aggregate;
pub mod calendar;
pub mod slip;
