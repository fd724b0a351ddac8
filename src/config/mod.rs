//! Configuration loading and management for the Job Cost Engine.
//!
//! This module loads the engine configuration (costing rules, reconciliation
//! tolerances and timesheet layout) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use job_cost_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Standard period: {}h", config.config().rules.standard_period_hours);
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::ConfigLoader;
pub use types::{EngineConfig, InputConfig, ReconciliationConfig, RulesConfig};
