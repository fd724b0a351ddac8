//! Application state for the Job Cost Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::roster::Roster;
use crate::run::{InMemoryRunStore, RunStore};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// engine configuration, the read-only roster, and the store of runs
/// awaiting overtime decisions.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
    roster: Arc<dyn Roster>,
    runs: Arc<dyn RunStore>,
}

impl AppState {
    /// Creates application state with an in-memory run store.
    pub fn new(config: EngineConfig, roster: impl Roster + 'static) -> Self {
        Self::with_run_store(config, roster, InMemoryRunStore::new())
    }

    /// Creates application state with the given run store.
    pub fn with_run_store(
        config: EngineConfig,
        roster: impl Roster + 'static,
        runs: impl RunStore + 'static,
    ) -> Self {
        Self {
            config: Arc::new(config),
            roster: Arc::new(roster),
            runs: Arc::new(runs),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the roster.
    pub fn roster(&self) -> &dyn Roster {
        self.roster.as_ref()
    }

    /// Returns the run store.
    pub fn runs(&self) -> &dyn RunStore {
        self.runs.as_ref()
    }
}
