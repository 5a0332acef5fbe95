//! agrismart-scan library interface
//!
//! Exposes the router and services for the binary and integration tests.

pub mod api;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ScanError, ScanResult};

use agrismart_common::config::{TomlConfig, DEFAULT_MAX_UPLOAD_BYTES};
use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{BarcodeExtractor, RegistryAuditor, RxingExtractor};

/// Application state shared across handlers
///
/// Everything in here is immutable after start-up.
#[derive(Clone)]
pub struct AppState {
    pub auditor: Arc<RegistryAuditor>,
    pub extractor: Arc<dyn BarcodeExtractor>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Request body cap for `/scan`
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(auditor: RegistryAuditor, extractor: Arc<dyn BarcodeExtractor>) -> Self {
        Self {
            auditor: Arc::new(auditor),
            extractor,
            startup_time: Utc::now(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Production state: rxing extractor and configured mirrors
    pub fn from_config(config: &TomlConfig) -> agrismart_common::Result<Self> {
        let auditor = RegistryAuditor::new(&config.registry)?;
        let mut state = Self::new(auditor, Arc::new(RxingExtractor::new()));
        state.max_upload_bytes = config.max_upload_bytes;
        Ok(state)
    }
}

/// Build application router
///
/// CORS is fully permissive: browser clients on any origin may call `/scan`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::scan_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
