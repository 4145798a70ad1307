use std::sync::Arc;

use serde_json::Value;

use crate::generation::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless pipeline definition; each request gets its own run.
    pub orchestrator: Orchestrator,
    /// Master profile as a JSON record. `None` when the profile file failed to load;
    /// generation requests are then refused.
    pub profile: Option<Arc<Value>>,
}
