//! Request and Response models for the bitonic API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ComputeRequest, ValidateRequest};
pub use responses::{ComputeResponse, HealthResponse, StatsResponse, ValidateResponse};
