//! Defensive read access to upstream diamond records
//!
//! Inventory records have no enforced schema. Every field is optional and a
//! field counts as present only when it is non-empty: `null`, `false`, `0`
//! and `""` are all treated as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::numeric;

pub mod fields {
    pub const DIAMOND_ID: &str = "diamond_id";
    pub const STOCK_NUM: &str = "stock_num";
    pub const SHAPE: &str = "shape";
    pub const SIZE: &str = "size";
    pub const COLOR: &str = "color";
    pub const CLARITY: &str = "clarity";
    pub const CUT: &str = "cut";
    pub const POLISH: &str = "polish";
    pub const SYMMETRY: &str = "symmetry";
    pub const FLUOR_INTENSITY: &str = "fluor_intensity";
    pub const LAB: &str = "lab";
    pub const CERT_NUM: &str = "cert_num";
    pub const MEAS_LENGTH: &str = "meas_length";
    pub const MEAS_WIDTH: &str = "meas_width";
    pub const MEAS_DEPTH: &str = "meas_depth";
    pub const DEPTH_PERCENT: &str = "depth_percent";
    pub const TABLE_PERCENT: &str = "table_percent";
    pub const PRICE_IN_CURRENCY: &str = "total_sales_price_in_currency";
    pub const PRICE: &str = "total_sales_price";
    pub const CURRENCY: &str = "currency_code";
    pub const IMAGE_FILE: &str = "image_file";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiamondRecord(Map<String, Value>);

impl DiamondRecord {
    /// Wrap a JSON object; any other JSON type is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(DiamondRecord(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| is_present(value))
    }

    /// Field rendered as text, if present
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(render)
    }

    /// Idempotency key: `stock_num`, falling back to `diamond_id`
    pub fn sku(&self) -> Option<String> {
        self.text(fields::STOCK_NUM)
            .or_else(|| self.text(fields::DIAMOND_ID))
    }

    /// Price in the display currency, else the base price, else `"0"`
    pub fn price(&self) -> String {
        self.text(fields::PRICE_IN_CURRENCY)
            .or_else(|| self.text(fields::PRICE))
            .unwrap_or_else(|| "0".to_string())
    }

    /// `"{lab} {size} Carat {color}-{clarity} {cut} Cut {shape} Diamond"`
    pub fn display_name(&self) -> String {
        let part = |key| self.text(key).unwrap_or_default();
        format!(
            "{} {} Carat {}-{} {} Cut {} Diamond",
            part(fields::LAB),
            self.text(fields::SIZE).unwrap_or_else(|| "N/A".to_string()),
            part(fields::COLOR),
            part(fields::CLARITY),
            part(fields::CUT),
            part(fields::SHAPE),
        )
        .trim()
        .to_string()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .map(numeric::format_number)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}
