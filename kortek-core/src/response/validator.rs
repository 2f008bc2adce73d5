use crate::response::shape::{CONFIDENCE_KEY, DATA_KEY, ResponseShape, is_empty_value, normalize};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Top-level keys that describe a response rather than carry its data.
static METADATA_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        CONFIDENCE_KEY,
        "status",
        "message",
        "source",
        "timestamp",
        "cached",
        "server_id",
        "elapsed",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Null or empty body.
    Empty,
    /// Declared confidence below the threshold, or not a finite number.
    LowConfidence { score: f64, threshold: f64 },
    /// Parsed fine but every data field is empty.
    NoSubstantiveData,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => f.write_str("empty response body"),
            Rejection::LowConfidence { score, threshold } => {
                write!(f, "confidence score {score} below threshold {threshold}")
            }
            Rejection::NoSubstantiveData => f.write_str("response carries no substantive data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Normalized payload ready for the caller.
    Accept(Value),
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept(_))
    }
}

/// Content-level checks applied on top of a 2xx status.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    threshold: f64,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl ResponseValidator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores `payload` and, when accepted, returns it normalized.
    pub fn accept(&self, payload: Value) -> Verdict {
        match self.check(&payload) {
            Some(rejection) => Verdict::Reject(rejection),
            None => Verdict::Accept(normalize(payload)),
        }
    }

    fn check(&self, payload: &Value) -> Option<Rejection> {
        if is_empty_value(payload) {
            return Some(Rejection::Empty);
        }

        let Value::Object(map) = payload else {
            // Non-empty arrays and scalars are data in their own right.
            return None;
        };

        if let Some(raw) = map.get(CONFIDENCE_KEY)
            && let Some(score) = confidence_of(raw)
            && (!score.is_finite() || score < self.threshold)
        {
            return Some(Rejection::LowConfidence {
                score,
                threshold: self.threshold,
            });
        }

        let has_data = match ResponseShape::detect(payload) {
            ResponseShape::Wrapped => map.get(DATA_KEY).is_some_and(|d| !is_empty_value(d)),
            ResponseShape::Direct => map
                .iter()
                .filter(|(key, _)| !METADATA_KEYS.contains(key.as_str()))
                .any(|(_, value)| !is_empty_value(value)),
        };

        if has_data {
            None
        } else {
            Some(Rejection::NoSubstantiveData)
        }
    }
}

fn confidence_of(raw: &Value) -> Option<f64> {
    let score = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    if score.is_none() && !raw.is_null() {
        tracing::warn!(value = %raw, "ignoring non-numeric confidence score");
    }

    score
}
