//! API Module
//!
//! HTTP handlers and routing for the bitonic REST API.
//!
//! # Endpoints
//! - `POST /bitonic` / `GET /bitonic` - Compute a bitonic sequence
//! - `POST /validate` - Validate a sequence
//! - `GET /stats` - Request and store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
