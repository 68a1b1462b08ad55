//! Numbers from loosely typed JSON
//!
//! Storefront and upstream payloads send numbers either as JSON numbers or as
//! numeric strings (`"6200.00"`). These helpers accept both.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Numeric value of a JSON number or a numeric string
pub fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Renders a number the way a JavaScript client would: `6200.0` as `6200`
pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Optional number; anything non-numeric reads as absent
pub fn loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64))
}

/// Optional count, truncated toward zero; negatives and non-numbers read as absent
pub fn loose_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = loose_f64(deserializer)?;
    Ok(number
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc().min(f64::from(u32::MAX)) as u32))
}

/// Required whole number of seconds, accepting floats and numeric strings
pub fn seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_f64(&value)
        .filter(|n| n.abs() < 9.0e15)
        .map(|n| n.trunc() as i64)
        .ok_or_else(|| de::Error::custom(format!("expected a number of seconds, got {value}")))
}
