use core_types::{FnKey, FunctionVector, ReducedKey};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::WeightError;

/// Canonical per-item weight, resolved once when the table is loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum WeightEntry {
    /// Scaled by the signed answer weight (+1 at pole A, -1 at pole B).
    Signed { vector: FunctionVector },
    /// Linearly interpolated from `a` (pole A) to `b` (pole B).
    Interpolated { a: FunctionVector, b: FunctionVector },
}

impl WeightEntry {
    pub fn signed(vector: FunctionVector) -> Self {
        WeightEntry::Signed { vector }
    }

    pub fn interpolated(a: FunctionVector, b: FunctionVector) -> Self {
        WeightEntry::Interpolated { a, b }
    }

    /// Reduced S/N/T/F weights, each split evenly over its two functions.
    pub fn reduced(weights: &[(ReducedKey, f64)]) -> Self {
        let mut vector = FunctionVector::zero();
        for (key, w) in weights {
            vector += FunctionVector::from_reduced(*key, *w);
        }
        WeightEntry::Signed { vector }
    }
}

/// Detects the entry shape and converts it. Precedence: `A`/`B`, `w`, `v`,
/// inline canonical keys, inline reduced keys.
pub(crate) fn parse_entry(id: &str, obj: &Map<String, Value>) -> Result<WeightEntry, WeightError> {
    if let (Some(a), Some(b)) = (obj.get("A"), obj.get("B")) {
        let a = parse_vector(id, a)?;
        let b = parse_vector(id, b)?;
        return Ok(WeightEntry::Interpolated { a, b });
    }
    if let Some(w) = obj.get("w") {
        return Ok(WeightEntry::Signed {
            vector: parse_vector(id, w)?,
        });
    }
    if let Some(v) = obj.get("v") {
        return Ok(WeightEntry::Signed {
            vector: parse_vector(id, v)?,
        });
    }
    if has_weight_keys(obj) {
        return Ok(WeightEntry::Signed {
            vector: vector_from_map(id, obj),
        });
    }
    Err(WeightError::Malformed {
        id: Some(id.to_string()),
        reason: "no recognised weight shape (A/B, w, v, function keys or S/N/T/F)".to_string(),
    })
}

pub(crate) fn parse_vector(id: &str, value: &Value) -> Result<FunctionVector, WeightError> {
    match value {
        Value::Object(obj) => Ok(vector_from_map(id, obj)),
        Value::Array(values) => {
            if values.len() != FnKey::ALL.len() {
                debug!(
                    "weights for {id}: vector has {} values, expected {}",
                    values.len(),
                    FnKey::ALL.len()
                );
            }
            let numbers = values
                .iter()
                .map(|v| coerce_number(id, v))
                .collect::<Vec<_>>();
            Ok(FunctionVector::from_slice(&numbers))
        }
        other => Err(WeightError::Malformed {
            id: Some(id.to_string()),
            reason: format!("expected a vector object or array, got {}", type_name(other)),
        }),
    }
}

/// Canonical keys are read directly; reduced keys are split evenly and added.
fn vector_from_map(id: &str, obj: &Map<String, Value>) -> FunctionVector {
    let mut out = FunctionVector::zero();
    for key in FnKey::ALL {
        if let Some(v) = obj.get(key.as_str()) {
            out[key] += coerce_number(id, v);
        }
    }
    for key in ReducedKey::ALL {
        if let Some(v) = obj.get(key.as_str()) {
            out += FunctionVector::from_reduced(key, coerce_number(id, v));
        }
    }
    out
}

fn has_weight_keys(obj: &Map<String, Value>) -> bool {
    FnKey::ALL.iter().any(|k| obj.contains_key(k.as_str()))
        || ReducedKey::ALL.iter().any(|k| obj.contains_key(k.as_str()))
}

/// Numbers pass through, numeric strings are parsed, everything else is 0.
pub(crate) fn coerce_number(id: &str, value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() => x,
        _ => {
            debug!("weights for {id}: non-numeric value {value} coerced to 0");
            0.0
        }
    }
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

#[cfg(test)]
mod tests {
    use core_types::{FnKey, FunctionVector, ReducedKey};
    use serde_json::json;

    use super::{WeightEntry, coerce_number, parse_entry};

    fn parse(value: serde_json::Value) -> WeightEntry {
        let obj = value.as_object().expect("object").clone();
        parse_entry("t", &obj).expect("entry")
    }

    #[test]
    fn map_and_array_vectors_agree() {
        let from_map = parse(json!({"w": {"Ni": 1, "Fe": -0.5}}));
        let from_arr = parse(json!({"v": [1, 0, 0, 0, 0, 0, 0, -0.5]}));
        assert_eq!(from_map, from_arr);
    }

    #[test]
    fn inline_keys_are_a_signed_vector() {
        let entry = parse(json!({"id": "q1", "Ti": 1}));
        assert_eq!(entry, WeightEntry::signed(FunctionVector::unit(FnKey::Ti, 1.0)));
    }

    #[test]
    fn reduced_keys_split_into_children() {
        let entry = parse(json!({"N": 1, "F": "-2"}));
        let WeightEntry::Signed { vector } = entry else {
            panic!("expected signed entry");
        };
        assert_eq!(vector[FnKey::Ni], 0.5);
        assert_eq!(vector[FnKey::Ne], 0.5);
        assert_eq!(vector[FnKey::Fi], -1.0);
        assert_eq!(vector[FnKey::Fe], -1.0);
        assert_eq!(
            WeightEntry::reduced(&[(ReducedKey::N, 1.0), (ReducedKey::F, -2.0)]),
            WeightEntry::signed(vector)
        );
    }

    #[test]
    fn a_b_takes_precedence_over_inline_keys() {
        let entry = parse(json!({"A": {"Si": 1}, "B": [0, 1], "Ti": 5}));
        assert_eq!(
            entry,
            WeightEntry::interpolated(
                FunctionVector::unit(FnKey::Si, 1.0),
                FunctionVector::unit(FnKey::Ne, 1.0)
            )
        );
    }

    #[test]
    fn unrecognised_shape_is_malformed() {
        let obj = json!({"id": "x", "text": "hello"});
        assert!(parse_entry("x", obj.as_object().expect("object")).is_err());
        let obj = json!({"w": "Ni"});
        assert!(parse_entry("x", obj.as_object().expect("object")).is_err());
    }

    #[test]
    fn coercion_falls_back_to_zero() {
        assert_eq!(coerce_number("t", &json!("1.5")), 1.5);
        assert_eq!(coerce_number("t", &json!("abc")), 0.0);
        assert_eq!(coerce_number("t", &json!(null)), 0.0);
        assert_eq!(coerce_number("t", &json!(true)), 0.0);
    }
}
