use crate::config::Config;
use crate::store::Storage;
use axum::extract::FromRef;
use std::sync::Arc;

/// Shared handle to the storage engine. Handlers depend on the trait object,
/// so the in-memory engine can later be swapped for a relational one.
pub type DynStorage = Arc<dyn Storage>;

#[derive(Clone)]
pub struct AppState {
    pub store: DynStorage,
    pub config: Config,
}

impl FromRef<AppState> for DynStorage {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
