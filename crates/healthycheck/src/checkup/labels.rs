//! Display lookups for result and history screens. Nothing here affects scoring.

use serde::Serialize;

use super::scoring::RiskLevel;

/// Describes the 1-5 appetite slider value.
pub fn appetite_label(score: u8) -> String {
    match score {
        1 => "Refuses to eat".to_string(),
        2 => "Poor appetite".to_string(),
        3 => "Fair / normal".to_string(),
        4 => "Eats well".to_string(),
        5 => "Eats very well".to_string(),
        other => format!("{other}/5"),
    }
}

/// Icon bucket for a reason or symptom line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCategory {
    Temperature,
    Vomiting,
    Hydration,
    Appetite,
    Digestion,
    Breathing,
    Seizure,
    Cough,
    Cold,
    Skin,
    Nursing,
    General,
}

impl ReasonCategory {
    /// Keyword match on the reason text; first matching bucket wins.
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();

        if mentions(&text, &["fever", "temperature", "hypothermia"]) {
            ReasonCategory::Temperature
        } else if mentions(&text, &["vomit"]) {
            ReasonCategory::Vomiting
        } else if mentions(&text, &["diaper", "urinat", "dehydrat"]) {
            ReasonCategory::Hydration
        } else if mentions(&text, &["breath"]) {
            ReasonCategory::Breathing
        } else if mentions(&text, &["appetite", "eating", "refuses to eat"]) {
            ReasonCategory::Appetite
        } else if mentions(&text, &["stool", "diarrh"]) {
            ReasonCategory::Digestion
        } else if mentions(&text, &["seizure"]) {
            ReasonCategory::Seizure
        } else if mentions(&text, &["cough"]) {
            ReasonCategory::Cough
        } else if mentions(&text, &["flu", "runny nose"]) {
            ReasonCategory::Cold
        } else if mentions(&text, &["rash", "skin"]) {
            ReasonCategory::Skin
        } else if mentions(&text, &["nurs"]) {
            ReasonCategory::Nursing
        } else {
            ReasonCategory::General
        }
    }

    /// Material icon name used by the renderers.
    pub fn icon(self) -> &'static str {
        match self {
            ReasonCategory::Temperature => "thermostat",
            ReasonCategory::Vomiting => "sick",
            ReasonCategory::Hydration => "water_drop",
            ReasonCategory::Appetite => "restaurant",
            ReasonCategory::Digestion => "spa",
            ReasonCategory::Breathing => "air",
            ReasonCategory::Seizure => "warning",
            ReasonCategory::Cough => "masks",
            ReasonCategory::Cold => "ac_unit",
            ReasonCategory::Skin => "healing",
            ReasonCategory::Nursing => "child_care",
            ReasonCategory::General => "warning_amber",
        }
    }
}

fn mentions(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Headline icon for a risk band.
pub fn risk_level_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "warning_amber",
        RiskLevel::Medium => "electric_bolt",
        RiskLevel::Low => "check_circle",
    }
}
