//! Services for agrismart-scan

pub mod barcode_extractor;
pub mod registry_auditor;

pub use barcode_extractor::{BarcodeExtractor, OpticalError, RxingExtractor};
pub use registry_auditor::{lookup_url, MirrorMiss, RegistryAuditor};
