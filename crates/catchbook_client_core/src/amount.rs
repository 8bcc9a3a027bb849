//! Numeric coercion for user-entered text and schema-free backend values.
//! Nothing here fails: anything that is not a usable number becomes 0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse free text typed by the user. Every character other than an ASCII digit
/// or `.` is dropped before parsing, so `"12.3abc"` is 12.3 and `"1 500"` is 1500.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Coerce a JSON value coming from the backend. Finite numbers pass through,
/// strings are parsed strictly (after trimming), everything else is 0.
pub fn coerce_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => finite_or_zero(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
            }
        }
        _ => 0.0,
    }
}

pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Serde helper: `#[serde(default, deserialize_with = "crate::amount::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_value(&value))
}
