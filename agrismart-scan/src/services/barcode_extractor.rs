//! Barcode extraction from uploaded images
//!
//! Two failure modes are kept apart: an image that cannot be parsed
//! (`OpticalError`) and a parsed image with no readable symbol (`Ok(None)`).

use thiserror::Error;

/// Image could not be read as a raster image
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct OpticalError(pub String);

/// Decodes the first barcode symbol found in raw image bytes
pub trait BarcodeExtractor: Send + Sync {
    fn extract(&self, image_bytes: &[u8]) -> Result<Option<String>, OpticalError>;
}

/// Production extractor: `image` for parsing, `rxing` for symbol detection
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingExtractor;

impl RxingExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeExtractor for RxingExtractor {
    fn extract(&self, image_bytes: &[u8]) -> Result<Option<String>, OpticalError> {
        let image =
            image::load_from_memory(image_bytes).map_err(|e| OpticalError(e.to_string()))?;

        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        tracing::debug!(width, height, "Decoded upload, scanning for barcodes");

        // rxing reports "nothing found" as an error; that is a miss, not an optical failure
        let symbols = match rxing::helpers::detect_multiple_in_luma(luma.into_raw(), width, height)
        {
            Ok(symbols) => symbols,
            Err(e) => {
                tracing::debug!(error = %e, "No barcode symbols detected");
                return Ok(None);
            }
        };

        let first = symbols
            .iter()
            .map(|symbol| symbol.getText().trim().to_string())
            .find(|text| !text.is_empty());

        if let Some(text) = &first {
            tracing::info!(
                barcode = %text,
                symbols = symbols.len(),
                "Extracted barcode from image"
            );
        }

        Ok(first)
    }
}
