//! Coerces whatever a model backend returns into a flat `Vec<f32>`.
//!
//! Backends disagree on output shape: typed float buffers, a nested
//! single-row batch, a `{ "data": [...] }` envelope, or an index-keyed
//! object (`{"0": 0.1, "1": 0.2}`) produced by some tensor serializers.

use insight_core::errors::EmbeddingError;
use serde_json::Value;

/// Raw model output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEmbedding {
    F32(Vec<f32>),
    F64(Vec<f64>),
    Json(Value),
}

/// Convert raw model output into a finite, non-empty `f32` vector.
pub fn to_vector(raw: RawEmbedding) -> Result<Vec<f32>, EmbeddingError> {
    let vector = match raw {
        RawEmbedding::F32(v) => v,
        RawEmbedding::F64(v) => v
            .into_iter()
            .map(narrow)
            .collect::<Result<Vec<_>, _>>()?,
        RawEmbedding::Json(value) => json_to_vector(&value)?,
    };

    if vector.is_empty() {
        return Err(format_error("empty embedding"));
    }
    if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
        return Err(format_error(format!("non-finite value at index {pos}")));
    }
    Ok(vector)
}

fn json_to_vector(value: &Value) -> Result<Vec<f32>, EmbeddingError> {
    match value {
        Value::Array(items) => {
            // A batch holding exactly one row.
            if let [only @ (Value::Array(_) | Value::Object(_))] = items.as_slice() {
                return json_to_vector(only);
            }
            items.iter().map(json_number).collect()
        }
        Value::Object(map) => {
            if let Some(data) = map.get("data") {
                return json_to_vector(data);
            }
            let mut indexed = Vec::with_capacity(map.len());
            for (key, v) in map {
                let idx: usize = key
                    .parse()
                    .map_err(|_| format_error(format!("unexpected key {key:?}")))?;
                indexed.push((idx, json_number(v)?));
            }
            indexed.sort_by_key(|(idx, _)| *idx);
            if indexed.iter().enumerate().any(|(pos, (idx, _))| pos != *idx) {
                return Err(format_error("index-keyed object is not contiguous from 0"));
            }
            Ok(indexed.into_iter().map(|(_, v)| v).collect())
        }
        other => Err(format_error(format!("unsupported shape: {}", type_name(other)))),
    }
}

fn json_number(value: &Value) -> Result<f32, EmbeddingError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format_error(format!("unrepresentable number {n}")))
            .and_then(narrow),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format_error(format!("non-numeric value {s:?}")))
            .and_then(narrow),
        other => Err(format_error(format!("non-numeric value of type {}", type_name(other)))),
    }
}

fn narrow(x: f64) -> Result<f32, EmbeddingError> {
    let narrowed = x as f32;
    if x.is_finite() && !narrowed.is_finite() {
        return Err(format_error(format!("value {x} overflows f32")));
    }
    Ok(narrowed)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn format_error(reason: impl Into<String>) -> EmbeddingError {
    EmbeddingError::Format {
        reason: reason.into(),
    }
}
