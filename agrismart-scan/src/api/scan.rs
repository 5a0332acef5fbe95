//! Scan endpoint
//!
//! POST /scan accepts a multipart form with an optional `manual_barcode`
//! text part and an optional `file` image part. A non-blank manual barcode
//! always wins over an image.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ScanError, ScanResult};
use crate::models::{AuditResult, ScanResponse};
use crate::AppState;

/// Form part carrying a typed barcode
pub const MANUAL_BARCODE_FIELD: &str = "manual_barcode";
/// Form part carrying image bytes
pub const FILE_FIELD: &str = "file";

/// Raw form contents before the priority rule is applied
#[derive(Debug, Default)]
pub struct ScanForm {
    pub manual_barcode: Option<String>,
    /// Upload bytes, or the error hit while reading them
    pub file: Option<Result<Bytes, String>>,
}

/// What the request asks to audit
#[derive(Debug, PartialEq)]
pub enum AuditQuery {
    Manual(String),
    Image(Bytes),
}

impl ScanForm {
    /// Manual barcode first, then image, otherwise no input
    pub fn into_query(self) -> ScanResult<AuditQuery> {
        if let Some(barcode) = self.manual_barcode {
            if !barcode.trim().is_empty() {
                return Ok(AuditQuery::Manual(barcode));
            }
        }

        match self.file {
            Some(Ok(bytes)) => Ok(AuditQuery::Image(bytes)),
            Some(Err(message)) => Err(ScanError::Optical(message)),
            None => Err(ScanError::NoInput),
        }
    }
}

/// POST /scan
pub async fn scan(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => read_form(multipart).await,
        Err(rejection) => {
            info!(reason = %rejection, "Scan request without multipart body");
            ScanForm::default()
        }
    };

    match run_scan(&state, form).await {
        Ok(result) => Json(ScanResponse::audited(result)).into_response(),
        Err(e) => {
            info!(reason = %e, "Scan rejected");
            e.into_response()
        }
    }
}

async fn run_scan(state: &AppState, form: ScanForm) -> ScanResult<AuditResult> {
    let barcode = match form.into_query()? {
        AuditQuery::Manual(barcode) => barcode,
        AuditQuery::Image(bytes) => extract_barcode(state, bytes).await?,
    };

    Ok(state.auditor.audit(&barcode).await)
}

/// Decode on the blocking pool; image parsing is CPU-bound
async fn extract_barcode(state: &AppState, bytes: Bytes) -> ScanResult<String> {
    let extractor = Arc::clone(&state.extractor);
    let decoded = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| ScanError::Optical(format!("decoder task failed: {}", e)))?;

    match decoded {
        Ok(Some(barcode)) => Ok(barcode),
        Ok(None) => Err(ScanError::NoBarcode),
        Err(e) => Err(ScanError::Optical(e.0)),
    }
}

/// Collect the known parts; unknown parts are skipped
async fn read_form(mut multipart: Multipart) -> ScanForm {
    let mut form = ScanForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed multipart body, using parts read so far");
                break;
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(MANUAL_BARCODE_FIELD) => match field.text().await {
                Ok(text) => form.manual_barcode = Some(text),
                Err(e) => warn!(error = %e, "Unreadable manual_barcode part"),
            },
            Some(FILE_FIELD) => {
                form.file = Some(field.bytes().await.map_err(|e| e.to_string()));
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form part");
            }
        }
    }

    form
}

/// Build scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/scan", post(scan))
}
