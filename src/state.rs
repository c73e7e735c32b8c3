use std::sync::Arc;

use crate::config::Mode;
use crate::store::DocumentStore;

/// Shared router state. The store is constructed exactly once at startup
/// and injected here; every clone of the state hands out the same instance,
/// so connection reuse comes for free and no hidden global is involved.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub mode: Mode,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, mode: Mode) -> Self {
        Self { store, mode }
    }
}
