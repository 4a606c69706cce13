//! Typed extraction of backend parameters from request JSON.
//!
//! Two flavours of numeric coercion exist. Strict accessors accept JSON
//! numbers only; lenient accessors additionally accept numeric strings such
//! as `"0.25"`. Neither accepts booleans or null.

use crate::error::{OptimizeError, Result};
use serde_json::{Map, Value};

/// Returns the parameter object, or an error naming `parameters`.
pub fn as_object(params: &Value) -> Result<&Map<String, Value>> {
    params.as_object().ok_or_else(|| {
        OptimizeError::parameter(
            "parameters",
            format!("expected an object, got {}", type_name(params)),
        )
    })
}

/// Reads an integer parameter, falling back to `default` when absent.
///
/// Numbers with a fractional part (including `10.0`) are rejected.
pub fn integer(map: &Map<String, Value>, key: &str, default: i64) -> Result<i64> {
    match map.get(key) {
        None => Ok(default),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| OptimizeError::parameter(key, format!("expected an integer, got {n}"))),
        Some(other) => Err(OptimizeError::parameter(
            key,
            format!("expected an integer, got {}", type_name(other)),
        )),
    }
}

/// Reads a finite floating-point parameter that must be a JSON number.
pub fn number(map: &Map<String, Value>, key: &str, default: f64) -> Result<f64> {
    match map.get(key) {
        None => Ok(default),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|x| x.is_finite())
            .ok_or_else(|| OptimizeError::parameter(key, format!("expected a finite number, got {n}"))),
        Some(other) => Err(OptimizeError::parameter(
            key,
            format!("expected a number, got {}", type_name(other)),
        )),
    }
}

/// Coerces a JSON number or numeric string to a finite `f64`.
pub fn lenient_number(value: &Value, name: &str) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() => Ok(x),
        Some(_) => Err(OptimizeError::parameter(name, "value must be finite")),
        None => Err(OptimizeError::parameter(
            name,
            format!("could not convert {} to a number", describe(value)),
        )),
    }
}

/// Extracts a fixed-width feature vector.
///
/// - An object contributes `keys[i]`, each defaulting to `defaults[i]`.
/// - An array contributes its first `defaults.len()` elements, padded with
///   `0.0` when shorter.
/// - Anything else yields `fallback`.
pub fn feature_vector(
    params: &Value,
    keys: &[&str],
    defaults: &[f64],
    fallback: &[f64],
) -> Result<Vec<f64>> {
    let dim = defaults.len();
    let mut features = match params {
        Value::Object(map) => keys
            .iter()
            .zip(defaults)
            .map(|(key, &default)| match map.get(*key) {
                Some(v) => lenient_number(v, key),
                None => Ok(default),
            })
            .collect::<Result<Vec<f64>>>()?,
        Value::Array(items) => items
            .iter()
            .take(dim)
            .enumerate()
            .map(|(i, v)| lenient_number(v, &format!("parameters[{i}]")))
            .collect::<Result<Vec<f64>>>()?,
        _ => fallback.to_vec(),
    };
    features.resize(dim, 0.0);
    Ok(features)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string {s:?}"),
        other => type_name(other).to_string(),
    }
}
