//! Error types for agrismart-scan
//!
//! Scan failures are part of the API contract: they are returned as a
//! `{success: false, message}` body with HTTP 200, never as a transport error.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ScanResponse;

/// User-visible scan failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// Neither a manual barcode nor an image was supplied
    #[error("No input provided.")]
    NoInput,

    /// The uploaded image could not be read or parsed
    #[error("Optical error: {0}")]
    Optical(String),

    /// The image parsed but holds no recognizable barcode
    #[error("No barcode found in image.")]
    NoBarcode,
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        Json(ScanResponse::failure(self.to_string())).into_response()
    }
}

/// Result type for scan handlers
pub type ScanResult<T> = Result<T, ScanError>;
