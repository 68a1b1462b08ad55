//! Grade scales and finish presets

use std::fmt;
use std::str::FromStr;

pub const COLOR_SCALE: [&str; 11] = ["D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N"];

pub const CLARITY_SCALE: [&str; 12] = [
    "FL", "IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "SI3", "I1", "I2", "I3",
];

/// Unfiltered colour range; wider than [`COLOR_SCALE`]
pub const FULL_COLOR_RANGE: (&str, &str) = ("D", "Z");
pub const FULL_CLARITY_RANGE: (&str, &str) = ("FL", "I3");

/// Collapse a set of selected grades to the `(from, to)` span they cover on
/// `scale`. Grades not on the scale are ignored; an empty or fully unknown
/// selection yields `full`.
pub fn grade_range<S: AsRef<str>>(
    selection: &[S],
    scale: &[&str],
    full: (&str, &str),
) -> (String, String) {
    let positions = selection
        .iter()
        .filter_map(|grade| {
            let grade = grade.as_ref().trim();
            scale.iter().position(|g| g.eq_ignore_ascii_case(grade))
        })
        .collect::<Vec<_>>();

    match (positions.iter().min(), positions.iter().max()) {
        (Some(&lo), Some(&hi)) => (scale[lo].to_string(), scale[hi].to_string()),
        _ => (full.0.to_string(), full.1.to_string()),
    }
}

/// Cut/polish/symmetry shorthand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishPreset {
    TripleExcellent,
    ExcellentMinus,
    VeryGoodPlus,
    VeryGoodMinus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finish {
    pub cut: &'static str,
    pub polish: &'static str,
    pub symmetry: &'static str,
}

impl FinishPreset {
    pub fn finish(self) -> Finish {
        let (cut, polish, symmetry) = match self {
            FinishPreset::TripleExcellent => ("Excellent", "Excellent", "Excellent"),
            FinishPreset::ExcellentMinus => ("Excellent", "Very Good", "Very Good"),
            FinishPreset::VeryGoodPlus => ("Very Good", "Excellent", "Excellent"),
            FinishPreset::VeryGoodMinus => ("Very Good", "Good", "Good"),
        };
        Finish {
            cut,
            polish,
            symmetry,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            FinishPreset::TripleExcellent => "3X",
            FinishPreset::ExcellentMinus => "EX-",
            FinishPreset::VeryGoodPlus => "VG+",
            FinishPreset::VeryGoodMinus => "VG-",
        }
    }
}

impl fmt::Display for FinishPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FinishPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "3X" => Ok(FinishPreset::TripleExcellent),
            "EX-" => Ok(FinishPreset::ExcellentMinus),
            "VG+" => Ok(FinishPreset::VeryGoodPlus),
            "VG-" => Ok(FinishPreset::VeryGoodMinus),
            other => Err(format!("unknown finish preset '{other}' (expected 3X, EX-, VG+ or VG-)")),
        }
    }
}
