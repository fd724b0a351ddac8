//! HTTP API module for the Job Cost Engine.
//!
//! This module exposes the two-phase run workflow over REST: create a run
//! from the weekly exports, then complete it with the overtime decisions.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CompleteRunRequest, CreateRunRequest};
pub use response::{ApiError, CreateRunResponse, HealthResponse};
pub use state::AppState;
