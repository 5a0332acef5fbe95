//! Product registry auditor
//!
//! Walks the configured mirrors strictly in order and stops at the first one
//! that reports a populated product. Every other outcome is a miss and moves
//! on to the next mirror; misses never reach the caller.

use agrismart_common::config::{MirrorSpec, RegistryConfig};
use agrismart_common::{Error, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{AuditResult, AuditedProduct, LookupResponse, ProductRecord};

/// Why a single mirror did not produce a match
///
/// Only used for logging; the audit outcome is the same for every variant.
#[derive(Debug, Error)]
pub enum MirrorMiss {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Product not listed")]
    NotFound,
}

/// `{base_url}/api/v0/product/{barcode}.json`
pub fn lookup_url(mirror: &MirrorSpec, barcode: &str) -> String {
    format!("{}/api/v0/product/{}.json", mirror.base_url, barcode)
}

/// Sequential multi-mirror registry client
pub struct RegistryAuditor {
    http_client: reqwest::Client,
    mirrors: Vec<MirrorSpec>,
}

impl RegistryAuditor {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is DISABLED for registry mirrors");
        }

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            mirrors: config.mirrors.clone(),
        })
    }

    pub fn mirrors(&self) -> &[MirrorSpec] {
        &self.mirrors
    }

    /// Audit a barcode against the mirrors, first match wins
    pub async fn audit(&self, barcode: &str) -> AuditResult {
        let barcode = barcode.trim();

        for mirror in &self.mirrors {
            match self.query_mirror(mirror, barcode).await {
                Ok(product) => {
                    info!(
                        barcode = %barcode,
                        mirror = %mirror.label,
                        name = %product.name,
                        safety = ?product.health.safety_status,
                        "Registry match"
                    );
                    return AuditResult::found(product);
                }
                Err(MirrorMiss::NotFound) => {
                    debug!(barcode = %barcode, mirror = %mirror.label, "Barcode not listed on mirror");
                }
                Err(miss) => {
                    warn!(
                        barcode = %barcode,
                        mirror = %mirror.label,
                        error = %miss,
                        "Mirror unavailable, trying next"
                    );
                }
            }
        }

        info!(barcode = %barcode, mirrors = self.mirrors.len(), "No registry match");
        AuditResult::not_found()
    }

    async fn query_mirror(
        &self,
        mirror: &MirrorSpec,
        barcode: &str,
    ) -> std::result::Result<AuditedProduct, MirrorMiss> {
        let url = lookup_url(mirror, barcode);
        debug!(mirror = %mirror.label, url = %url, "Querying registry mirror");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| MirrorMiss::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(MirrorMiss::HttpStatus(status.as_u16()));
        }

        let payload: LookupResponse = response
            .json()
            .await
            .map_err(|e| MirrorMiss::Malformed(e.to_string()))?;

        let product = payload.matched_product().ok_or(MirrorMiss::NotFound)?;
        let record =
            ProductRecord::from_map(product).map_err(|e| MirrorMiss::Malformed(e.to_string()))?;

        Ok(AuditedProduct::from_record(&mirror.label, barcode, record))
    }
}
