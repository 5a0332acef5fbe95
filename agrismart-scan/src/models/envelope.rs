//! `/scan` response envelope

use serde::Serialize;

use super::audit::AuditResult;

/// One audited barcode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanItem {
    pub details: AuditResult,
}

/// `{success, data}` on success, `{success, message}` on failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ScanItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScanResponse {
    pub fn audited(result: AuditResult) -> Self {
        Self {
            success: true,
            data: Some(vec![ScanItem { details: result }]),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
