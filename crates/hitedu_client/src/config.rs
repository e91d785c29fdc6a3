//! crates/hitedu_client/src/config.rs
//!
//! Client SDK configuration.
//!
//! Everything has a sensible default so embedding the client needs no
//! setup; `from_env` is for deployments that want to point it elsewhere.
//! The `.env` file is honoured for local development but skipped in test
//! environments to keep tests hermetic.

use std::path::PathBuf;

/// Where the client reaches the primary backend and where the local
/// fallback store keeps its files.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the primary REST backend, including the `/api` prefix.
    pub api_base: String,
    /// Directory the local fallback store persists its JSON records in.
    pub data_dir: PathBuf,
    /// Emulate network latency on local store operations so the UI feels
    /// the same whichever backend serves it.
    pub simulate_latency: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3001/api".to_string(),
            data_dir: PathBuf::from("./hitedu_data"),
            simulate_latency: true,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Self {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let defaults = Self::default();
        let api_base = std::env::var("HITEDU_API_BASE").unwrap_or(defaults.api_base);
        let data_dir = std::env::var("HITEDU_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Self {
            api_base,
            data_dir,
            simulate_latency: true,
        }
    }
}
