//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use hitedu_core::StoreService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreService>,
    pub config: Arc<Config>,
}
