//! Normalized audit result
//!
//! Serializes as `{"found": false}` on a miss, or as the flat product summary
//! with a nested `health` block on a match.

use serde::Serialize;

use super::product::ProductRecord;

/// NOVA groups at or above this level are ultra-processed
pub const HARMFUL_NOVA_GROUP: u32 = 4;
/// Additive counts at or above this level are flagged
pub const HARMFUL_ADDITIVE_COUNT: usize = 5;

const ADDITIVE_PREFIX: &str = "en:";

const UNKNOWN_NAME: &str = "Unknown Item";
const GENERIC_BRAND: &str = "Generic Brand";
const GLOBAL_ORIGIN: &str = "Global Distribution";
const NO_INGREDIENTS: &str = "Ingredients not listed in registry.";

/// Outcome of a registry audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    pub found: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub product: Option<AuditedProduct>,
}

impl AuditResult {
    /// No mirror reported a match
    pub fn not_found() -> Self {
        Self {
            found: false,
            product: None,
        }
    }

    pub fn found(product: AuditedProduct) -> Self {
        Self {
            found: true,
            product: Some(product),
        }
    }
}

/// Product summary built from a matched registry record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditedProduct {
    /// Label of the mirror that produced the match
    pub category: String,
    pub barcode: String,
    pub name: String,
    pub brand: String,
    pub origin: String,
    pub ingredients: String,
    pub health: HealthSummary,
}

impl AuditedProduct {
    pub fn from_record(category: &str, barcode: &str, record: ProductRecord) -> Self {
        let name = non_blank(record.product_name)
            .or_else(|| non_blank(record.product_name_en))
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Self {
            category: category.to_string(),
            barcode: barcode.to_string(),
            name,
            brand: non_blank(record.brands).unwrap_or_else(|| GENERIC_BRAND.to_string()),
            // A present-but-empty country list is reported as-is
            origin: record.countries.unwrap_or_else(|| GLOBAL_ORIGIN.to_string()),
            ingredients: non_blank(record.ingredients_text)
                .unwrap_or_else(|| NO_INGREDIENTS.to_string()),
            health: HealthSummary::assess(record.nova_group, &record.additives_tags),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Safety verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SafetyStatus {
    Good,
    Harmful,
}

impl SafetyStatus {
    /// GOOD iff the product is not ultra-processed and carries fewer than
    /// five additives. NOVA group 0 means "unknown" and never counts against it.
    pub fn classify(nova_group: u32, chemical_count: usize) -> Self {
        let processing_ok = nova_group == 0 || nova_group < HARMFUL_NOVA_GROUP;
        if processing_ok && chemical_count < HARMFUL_ADDITIVE_COUNT {
            SafetyStatus::Good
        } else {
            SafetyStatus::Harmful
        }
    }
}

/// Health block of an audit result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub safety_status: SafetyStatus,
    pub processing_lvl: String,
    pub chemical_count: usize,
    pub chemical_list: Vec<String>,
}

impl HealthSummary {
    pub fn assess(nova_group: u32, additives_tags: &[String]) -> Self {
        let chemical_list: Vec<String> = additives_tags
            .iter()
            .map(|tag| normalize_additive(tag))
            .collect();
        let chemical_count = chemical_list.len();

        Self {
            safety_status: SafetyStatus::classify(nova_group, chemical_count),
            processing_lvl: processing_level(nova_group),
            chemical_count,
            chemical_list,
        }
    }
}

/// `Level N` for a known NOVA group, `N/A` otherwise
pub fn processing_level(nova_group: u32) -> String {
    if nova_group == 0 {
        "N/A".to_string()
    } else {
        format!("Level {}", nova_group)
    }
}

/// `en:e330` -> `E330`
pub fn normalize_additive(tag: &str) -> String {
    tag.replace(ADDITIVE_PREFIX, "").to_uppercase()
}
