//! Storage for runs awaiting overtime decisions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use super::RunContext;

/// Holds phase-1 run contexts between the two phases.
pub trait RunStore: Send + Sync {
    /// Stores a context under its run id, replacing any previous one.
    fn insert(&self, context: RunContext);

    /// Returns a copy of the context for a run.
    fn get(&self, run_id: Uuid) -> Option<RunContext>;

    /// Removes and returns the context for a run.
    fn remove(&self, run_id: Uuid) -> Option<RunContext>;
}

/// How long an uncompleted run is kept by default.
pub const DEFAULT_RUN_MAX_AGE_HOURS: i64 = 24;

/// How many uncompleted runs are kept by default.
pub const DEFAULT_RUN_CAPACITY: usize = 1000;

/// A [`RunStore`] held in process memory. Runs are lost on restart.
///
/// Runs never completed are evicted on insert once they are older than the
/// maximum age, and the oldest runs are evicted when the store is at
/// capacity. An expired run is not returned even before it is evicted.
///
/// # Example
///
/// ```
/// use job_cost_engine::run::{InMemoryRunStore, RunStore};
/// use uuid::Uuid;
///
/// let store = InMemoryRunStore::new();
/// assert!(store.get(Uuid::new_v4()).is_none());
/// assert!(store.is_empty());
/// ```
#[derive(Debug)]
pub struct InMemoryRunStore {
    runs: Mutex<HashMap<Uuid, RunContext>>,
    max_age: Duration,
    capacity: usize,
}

impl Default for InMemoryRunStore {
    fn default() -> Self {
        Self::with_limits(
            Duration::hours(DEFAULT_RUN_MAX_AGE_HOURS),
            DEFAULT_RUN_CAPACITY,
        )
    }
}

impl InMemoryRunStore {
    /// Creates an empty store with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store keeping runs for at most `max_age`, and at
    /// most `capacity` runs (at least one).
    pub fn with_limits(max_age: Duration, capacity: usize) -> Self {
        Self {
            runs: Mutex::new(HashMap::new()),
            max_age,
            capacity: capacity.max(1),
        }
    }

    /// Returns the number of stored runs.
    pub fn len(&self) -> usize {
        self.runs().len()
    }

    /// Returns true if no runs are stored.
    pub fn is_empty(&self) -> bool {
        self.runs().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn runs(&self) -> MutexGuard<'_, HashMap<Uuid, RunContext>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, context: &RunContext) -> bool {
        Utc::now() - context.created_at > self.max_age
    }
}

impl RunStore for InMemoryRunStore {
    fn insert(&self, context: RunContext) {
        let mut runs = self.runs();

        let before = runs.len();
        runs.retain(|_, stored| !self.is_expired(stored));

        while runs.len() >= self.capacity && !runs.contains_key(&context.run_id) {
            let Some(oldest) = runs
                .values()
                .min_by_key(|stored| stored.created_at)
                .map(|stored| stored.run_id)
            else {
                break;
            };
            runs.remove(&oldest);
        }

        if runs.len() < before {
            debug!(evicted = before - runs.len(), "evicted uncompleted runs");
        }
        runs.insert(context.run_id, context);
    }

    fn get(&self, run_id: Uuid) -> Option<RunContext> {
        self.runs()
            .get(&run_id)
            .filter(|context| !self.is_expired(context))
            .cloned()
    }

    fn remove(&self, run_id: Uuid) -> Option<RunContext> {
        self.runs()
            .remove(&run_id)
            .filter(|context| !self.is_expired(context))
    }
}
