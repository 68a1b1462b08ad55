//! Typed search filters and their wire encoding
//!
//! Unset filters are sent as the full domain rather than omitted, which is
//! how the inventory API expects "no constraint" to be expressed.

use bon::Builder;
use serde::Serialize;
use serde_json::Value;

use super::grades::{
    CLARITY_SCALE, COLOR_SCALE, FULL_CLARITY_RANGE, FULL_COLOR_RANGE, Finish, FinishPreset,
    grade_range,
};

pub const ALL_SHAPES: [&str; 10] = [
    "Round", "Pear", "Princess", "Marquise", "Oval", "Radiant", "Emerald", "Heart", "Cushion",
    "Asscher",
];
pub const ALL_LABS: [&str; 6] = ["GIA", "IGI", "HRD", "AGS", "GCAL", "NONE"];
pub const ALL_FLUORESCENCE_INTENSITIES: [&str; 7] = [
    "None", "Faint", "Very Slight", "Slight", "Medium", "Strong", "Very Strong",
];
pub const ALL_FLUORESCENCE_COLORS: [&str; 6] = ["Blue", "Yellow", "Green", "Red", "Orange", "White"];

const DEFAULT_SIZE: (&str, &str) = ("0.01", "99");
const DEFAULT_PRICE: (&str, &str) = ("1", "99999999");
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct SearchFilters {
    #[builder(default)]
    pub shapes: Vec<String>,
    #[builder(default)]
    pub labs: Vec<String>,
    #[builder(default)]
    pub fluorescence_intensities: Vec<String>,
    #[builder(default)]
    pub fluorescence_colors: Vec<String>,
    /// Selected colour grades, collapsed to a range when encoded
    #[builder(default)]
    pub colors: Vec<String>,
    #[builder(default)]
    pub clarities: Vec<String>,
    #[builder(into)]
    pub size_from: Option<String>,
    #[builder(into)]
    pub size_to: Option<String>,
    #[builder(into)]
    pub price_from: Option<String>,
    #[builder(into)]
    pub price_to: Option<String>,
    /// Explicit cut/polish/symmetry bounds override the preset
    pub finish: Option<FinishPreset>,
    #[builder(into)]
    pub cut_from: Option<String>,
    #[builder(into)]
    pub cut_to: Option<String>,
    #[builder(into)]
    pub polish_from: Option<String>,
    #[builder(into)]
    pub polish_to: Option<String>,
    #[builder(into)]
    pub symmetry_from: Option<String>,
    #[builder(into)]
    pub symmetry_to: Option<String>,
    #[builder(into)]
    pub fancy_color_intensity_from: Option<String>,
    #[builder(into)]
    pub fancy_color_intensity_to: Option<String>,
    #[builder(into)]
    pub eye_clean: Option<String>,
    #[builder(into)]
    pub sort_by: Option<String>,
    #[builder(into)]
    pub sort_direction: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// Search body exactly as the inventory API receives it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub search_type: String,
    pub shapes: Vec<String>,
    pub labs: Vec<String>,
    pub fluorescence_intensities: Vec<String>,
    pub fluorescence_colors: Vec<String>,
    pub size_from: String,
    pub size_to: String,
    pub color_from: String,
    pub color_to: String,
    pub clarity_from: String,
    pub clarity_to: String,
    pub price_total_from: String,
    pub price_total_to: String,
    pub fancy_color_intensity_from: String,
    pub fancy_color_intensity_to: String,
    pub cut_from: String,
    pub cut_to: String,
    pub polish_from: String,
    pub polish_to: String,
    pub symmetry_from: String,
    pub symmetry_to: String,
    pub eye_clean: String,
    pub sort_by: String,
    pub sort_direction: String,
    pub page_number: String,
    pub page_size: String,
}

impl SearchFilters {
    pub fn page(&self) -> u32 {
        self.page_number.unwrap_or(1).max(1)
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn to_request(&self) -> SearchRequest {
        let (color_from, color_to) = grade_range(&self.colors, &COLOR_SCALE, FULL_COLOR_RANGE);
        let (clarity_from, clarity_to) =
            grade_range(&self.clarities, &CLARITY_SCALE, FULL_CLARITY_RANGE);
        let preset = self.finish.map(FinishPreset::finish);
        let finish_or = |explicit: &Option<String>, pick: fn(Finish) -> &'static str| {
            explicit
                .clone()
                .or_else(|| preset.map(|f| pick(f).to_string()))
                .unwrap_or_default()
        };

        SearchRequest {
            search_type: "White".to_string(),
            shapes: or_all(&self.shapes, &ALL_SHAPES),
            labs: or_all(&self.labs, &ALL_LABS),
            fluorescence_intensities: or_all(
                &self.fluorescence_intensities,
                &ALL_FLUORESCENCE_INTENSITIES,
            ),
            fluorescence_colors: or_all(&self.fluorescence_colors, &ALL_FLUORESCENCE_COLORS),
            size_from: or_default(&self.size_from, DEFAULT_SIZE.0),
            size_to: or_default(&self.size_to, DEFAULT_SIZE.1),
            color_from,
            color_to,
            clarity_from,
            clarity_to,
            price_total_from: or_default(&self.price_from, DEFAULT_PRICE.0),
            price_total_to: or_default(&self.price_to, DEFAULT_PRICE.1),
            fancy_color_intensity_from: or_default(&self.fancy_color_intensity_from, ""),
            fancy_color_intensity_to: or_default(&self.fancy_color_intensity_to, ""),
            cut_from: finish_or(&self.cut_from, |f| f.cut),
            cut_to: finish_or(&self.cut_to, |f| f.cut),
            polish_from: finish_or(&self.polish_from, |f| f.polish),
            polish_to: finish_or(&self.polish_to, |f| f.polish),
            symmetry_from: finish_or(&self.symmetry_from, |f| f.symmetry),
            symmetry_to: finish_or(&self.symmetry_to, |f| f.symmetry),
            eye_clean: or_default(&self.eye_clean, ""),
            sort_by: or_default(&self.sort_by, "Price"),
            sort_direction: or_default(&self.sort_direction, "Asc"),
            page_number: self.page().to_string(),
            page_size: self.effective_page_size().to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self.to_request()).unwrap_or(Value::Null)
    }
}

fn or_all(selection: &[String], all: &[&str]) -> Vec<String> {
    if selection.is_empty() {
        all.iter().map(|s| s.to_string()).collect()
    } else {
        selection.to_vec()
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}
