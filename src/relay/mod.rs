//! Relay core: session registry, liveness monitor, capture coordinator,
//! and answer distributor.
//!
//! Each component owns exactly one logical resource behind its own
//! serialization boundary; locks are never held across await points.

use std::sync::Arc;

use crate::config::GlobalConfig;

pub mod answers;
pub mod capture;
pub mod liveness;
pub mod registry;

pub use answers::AnswerDistributor;
pub use capture::CaptureCoordinator;
pub use registry::SessionRegistry;

/// Shared application state accessible by all transport handlers.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Live peer sessions keyed by role.
    pub registry: Arc<SessionRegistry>,
    /// Single-flight capture slot.
    pub capture: CaptureCoordinator,
    /// Versioned answer store with push distribution.
    pub answers: AnswerDistributor,
}

impl AppState {
    /// Build the shared state from a loaded configuration.
    #[must_use]
    pub fn new(config: GlobalConfig) -> Arc<Self> {
        let registry = Arc::new(SessionRegistry::new());
        let capture = CaptureCoordinator::new(config.capture_timeout());
        let answers = AnswerDistributor::new(Arc::clone(&registry));
        Arc::new(Self {
            config: Arc::new(config),
            registry,
            capture,
            answers,
        })
    }
}
