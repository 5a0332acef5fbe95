//! Data models for registry records, audit results and the HTTP envelope

pub mod audit;
pub mod envelope;
pub mod product;

pub use audit::{AuditResult, AuditedProduct, HealthSummary, SafetyStatus};
pub use envelope::{ScanItem, ScanResponse};
pub use product::{LookupResponse, ProductRecord};
