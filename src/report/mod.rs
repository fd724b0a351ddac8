//! Report rendering.
//!
//! The [`JobCostReport`](crate::models::JobCostReport) itself serializes to
//! JSON through serde; this module renders the CSV job-cost allocation layout
//! used for bookkeeping import.

mod allocation;

pub use allocation::{ALLOCATION_HEADERS, write_allocation_csv};
