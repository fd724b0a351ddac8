//! Two-phase job costing runs.
//!
//! A run is prepared from parsed timesheets, parked in a [`RunStore`] while
//! overtime targets are chosen, and completed into a
//! [`JobCostReport`](crate::models::JobCostReport).

mod context;
mod engine;
mod store;

pub use context::{PreparedEmployee, RunContext};
pub use engine::JobCostEngine;
pub use store::{DEFAULT_RUN_CAPACITY, DEFAULT_RUN_MAX_AGE_HOURS, InMemoryRunStore, RunStore};
