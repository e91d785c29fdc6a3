//! Client SDK for the HitEdu platform.
//!
//! Every domain operation is tried against the HTTP backend first and,
//! strictly on transport failure, re-routed to a local persistent store
//! with the identical contract. Callers never see which one answered.

pub mod adapters;
pub mod client;
pub mod config;
pub mod fallback;
pub mod session;
pub mod storage;

pub use adapters::{HttpBackend, LocalBackend};
pub use client::HitEduClient;
pub use config::ClientConfig;
pub use fallback::{is_transport_error, with_fallback, with_fallback_classified};
pub use session::SessionHolder;
pub use storage::KvStore;
