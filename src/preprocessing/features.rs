use crate::error::InferenceError;
use serde_json::{Map, Value};

/// Number of clinical features the model consumes.
pub const NUM_FEATURES: usize = 13;

/// Request fields in the order the model was trained on.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// One patient's features, in `FEATURE_NAMES` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector(pub [i64; NUM_FEATURES]);

impl FeatureVector {
    /// Builds the vector from a decoded JSON body.
    ///
    /// Every field is required; nothing is defaulted and no ranges are checked.
    pub fn from_json(payload: &Value) -> Result<Self, InferenceError> {
        let object = payload.as_object().ok_or_else(|| {
            InferenceError::InvalidPayload(format!("expected a JSON object, got {}", payload))
        })?;

        let mut values = [0i64; NUM_FEATURES];
        for (slot, &name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            *slot = field_as_int(object, name)?;
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[i64; NUM_FEATURES] {
        &self.0
    }
}

fn field_as_int(object: &Map<String, Value>, name: &'static str) -> Result<i64, InferenceError> {
    let value = object.get(name).ok_or(InferenceError::MissingField(name))?;
    coerce_int(value).ok_or_else(|| InferenceError::InvalidField {
        field: name,
        value: value.to_string(),
    })
}

/// Integer coercion: integers pass, finite floats truncate toward zero,
/// booleans map to 0/1 and strings must hold a (signed) base-10 integer.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                let f = n.as_f64()?;
                // Beyond i64 range, including u64 values above i64::MAX.
                if !f.is_finite() || f.trunc() < i64::MIN as f64 || f.trunc() >= i64::MAX as f64 {
                    return None;
                }
                Some(f.trunc() as i64)
            }
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => parse_int_literal(s),
        _ => None,
    }
}

fn parse_int_literal(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed)
        .replace('_', "");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Underscores only between digits, as in "1_000".
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned.starts_with('_') || unsigned.ends_with('_') || unsigned.contains("__") {
        return None;
    }
    let negative = trimmed.starts_with('-');
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
