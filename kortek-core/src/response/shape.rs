use serde_json::Value;

/// Provider-supplied self-assessment of how trustworthy a response is.
pub const CONFIDENCE_KEY: &str = "confidence_score";
/// Payload field of the wrapped shape.
pub const DATA_KEY: &str = "data";

/// The two payload layouts providers use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"confidence_score": .., "data": ..}`
    Wrapped,
    /// Substantive fields at the top level, no wrapper.
    Direct,
}

impl ResponseShape {
    pub fn detect(payload: &Value) -> Self {
        match payload {
            Value::Object(map) if map.contains_key(CONFIDENCE_KEY) && map.contains_key(DATA_KEY) => {
                ResponseShape::Wrapped
            }
            _ => ResponseShape::Direct,
        }
    }
}

/// Unwraps the wrapped shape to its `data` value; the direct shape is returned as is.
pub fn normalize(payload: Value) -> Value {
    match ResponseShape::detect(&payload) {
        ResponseShape::Direct => payload,
        ResponseShape::Wrapped => match payload {
            Value::Object(mut map) => map.remove(DATA_KEY).unwrap_or(Value::Null),
            other => other,
        },
    }
}

/// Null, blank strings and empty containers carry no data.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
