//! API Handlers
//!
//! HTTP request handlers for each endpoint. Handlers translate DTOs and
//! delegate to the sequence service.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::bitonic::Mode;
use crate::cache::{KvStore, MemoryStore};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ComputeRequest, ComputeResponse, HealthResponse, StatsResponse, ValidateRequest,
    ValidateResponse,
};
use crate::service::SequenceService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SequenceService>,
    /// Mode used when a request does not name one
    pub default_mode: Mode,
}

impl AppState {
    pub fn new(service: SequenceService, default_mode: Mode) -> Self {
        Self {
            service: Arc::new(service),
            default_mode,
        }
    }

    /// Creates state backed by a fresh in-memory store sized from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new(config.max_entries)))
    }

    /// Creates state backed by the given store.
    pub fn with_store(config: &Config, store: Arc<dyn KvStore>) -> Self {
        Self::new(SequenceService::from_config(config, store), config.default_mode)
    }
}

/// Handler for POST /bitonic
pub async fn compute_handler(
    State(state): State<AppState>,
    Json(req): Json<ComputeRequest>,
) -> Result<Json<ComputeResponse>> {
    compute(&state, req).await
}

/// Handler for GET /bitonic?n=&l=&r=
pub async fn compute_query_handler(
    State(state): State<AppState>,
    Query(req): Query<ComputeRequest>,
) -> Result<Json<ComputeResponse>> {
    compute(&state, req).await
}

async fn compute(state: &AppState, req: ComputeRequest) -> Result<Json<ComputeResponse>> {
    let (params, strategy) = req.into_parts(state.default_mode);
    let computation = state.service.compute(params, strategy).await?;
    Ok(Json(computation.into()))
}

/// Handler for POST /validate
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let result = if req.diagnostic {
        state.service.diagnose(&req.sequence)
    } else {
        state.service.validate(&req.sequence)
    };

    Json(ValidateResponse::new(result, req.sequence.len()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.service.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
