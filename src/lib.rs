//! Bitonic Cache - bitonic sequence generation behind a TTL result cache
//!
//! Builds and validates bitonic integer sequences and caches computed
//! results so identical requests avoid recomputation.

pub mod api;
pub mod bitonic;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{BitonicError, Result};
pub use service::SequenceService;
pub use tasks::spawn_cleanup_task;
