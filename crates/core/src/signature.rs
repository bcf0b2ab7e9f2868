//! Allpay request signatures.
//!
//! The provider signs a JSON object by concatenating its values in key order:
//!
//! 1. Drop the `sign` key and any key whose value is `null` or `""`.
//! 2. Sort the remaining keys.
//! 3. Emit each value: objects recurse with the same rule, arrays emit their
//!    elements in order, scalars are stringified.
//! 4. Join with `:`, append `:` and the API key, SHA-256, lowercase hex.
//!
//! Numbers are stringified the way the provider's reference client does it:
//! integral values carry no fractional part (`185`, not `185.0`).

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Name of the signature field in signed payloads.
pub const SIGN_FIELD: &str = "sign";

/// The colon-joined string that gets hashed, including the API key.
#[must_use]
pub fn sign_string(params: &Map<String, Value>, api_key: &str) -> String {
    let mut values = Vec::new();
    collect_object(params, &mut values);
    values.push(api_key.to_string());
    values.join(":")
}

/// Signature of a payload.
#[must_use]
pub fn sign(params: &Map<String, Value>, api_key: &str) -> String {
    hex::encode(Sha256::digest(sign_string(params, api_key).as_bytes()))
}

/// Check the `sign` field of an inbound payload.
///
/// A missing or empty `sign` never verifies.
#[must_use]
pub fn verify(payload: &Map<String, Value>, api_key: &str) -> bool {
    let Some(received) = payload
        .get(SIGN_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        return false;
    };
    constant_time_compare(&sign(payload, api_key), received)
}

/// Compare two strings without short-circuiting on the first difference.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

fn collect_object(object: &Map<String, Value>, out: &mut Vec<String>) {
    let mut entries: Vec<(&String, &Value)> = object
        .iter()
        .filter(|(key, value)| key.as_str() != SIGN_FIELD && !is_blank(value))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (_, value) in entries {
        match value {
            Value::Array(items) => {
                for item in items {
                    collect_element(item, out);
                }
            }
            Value::Object(nested) => collect_object(nested, out),
            scalar => out.push(scalar_to_string(scalar)),
        }
    }
}

fn collect_element(item: &Value, out: &mut Vec<String>) {
    match item {
        Value::Object(nested) => collect_object(nested, out),
        Value::Array(items) => {
            for inner in items {
                collect_element(inner, out);
            }
        }
        scalar => out.push(scalar_to_string(scalar)),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
