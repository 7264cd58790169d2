//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedEfaClient;
use crate::persistence::{NoopSink, StopSink};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached EFA client
    pub efa: Arc<CachedEfaClient>,

    /// Where discovered stops are persisted
    pub stops: Arc<dyn StopSink>,
}

impl AppState {
    /// Create a new app state that does not persist stops.
    pub fn new(efa: CachedEfaClient) -> Self {
        Self {
            efa: Arc::new(efa),
            stops: Arc::new(NoopSink),
        }
    }

    /// Persist discovered stops to `sink`.
    pub fn with_stop_sink(mut self, sink: Arc<dyn StopSink>) -> Self {
        self.stops = sink;
        self
    }
}
