//! Permissive field decoding for Gamma API payloads.
//!
//! The Gamma API is loose about types: numeric fields arrive as JSON
//! numbers or as quoted strings, and list fields (`outcomePrices`,
//! `outcomes`) arrive either as native arrays or as JSON-encoded strings.
//! Every external field read goes through one of these accessors so the
//! defaulting policy lives in one place instead of inline fallbacks.

use serde_json::Value;

/// Coerce a JSON number or numeric string to f64. Missing, null, or
/// unparseable values default to 0.0.
pub fn lenient_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coerce a JSON string to an owned String, defaulting when missing or
/// not a string.
pub fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Decode an outcome price list. Accepts a native array of numbers or
/// numeric strings, or a JSON-encoded string like `"[\"0.4\", \"0.6\"]"`.
/// Any parse failure yields an empty sequence, never an error.
pub fn price_list(value: Option<&Value>) -> Vec<f64> {
    match value {
        Some(Value::Array(items)) => items.iter().map(|v| lenient_f64(Some(v))).collect(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items.iter().map(|v| lenient_f64(Some(v))).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
