//! Registry response shapes
//!
//! Only the fields used by the audit are modelled; everything else in the
//! registry payload is ignored.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level payload of `/api/v0/product/{barcode}.json`
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    /// 1 when the registry knows the barcode; only a JSON integer counts
    #[serde(default, deserialize_with = "de_status")]
    pub status: u64,
    /// Raw product object (absent or `{}` on a miss)
    #[serde(default)]
    pub product: Option<Map<String, Value>>,
}

impl LookupResponse {
    /// The product record when this response is a definitive match
    pub fn matched_product(self) -> Option<Map<String, Value>> {
        if self.status != 1 {
            return None;
        }
        self.product.filter(|p| !p.is_empty())
    }
}

/// Product fields consulted by the audit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "de_display_text")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "de_display_text")]
    pub product_name_en: Option<String>,
    #[serde(default, deserialize_with = "de_display_text")]
    pub brands: Option<String>,
    #[serde(default, deserialize_with = "de_display_text")]
    pub countries: Option<String>,
    #[serde(default, deserialize_with = "de_display_text")]
    pub ingredients_text: Option<String>,
    /// NOVA processing group, 0 when absent or unparseable
    #[serde(default, deserialize_with = "de_lenient_u32")]
    pub nova_group: u32,
    #[serde(default, deserialize_with = "de_string_list")]
    pub additives_tags: Vec<String>,
}

impl ProductRecord {
    pub fn from_map(map: Map<String, Value>) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(map))
    }
}

/// `"1"` or `1.0` is not a match, only the integer 1
fn de_status<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

/// Text field that tolerates numbers, booleans and string lists.
///
/// A wrongly typed display field must not discard an otherwise valid match.
fn de_display_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    })
}

/// Registries emit numbers either as JSON integers or numeric strings.
fn de_lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Null-tolerant list of strings; non-string entries are dropped
fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
