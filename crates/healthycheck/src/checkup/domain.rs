use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::intake::coerce_count;

/// Sex of the child as captured by the form (`M` / `F` on the wire).
///
/// Decoding accepts the English and Indonesian labels the form has used;
/// anything else reads as [`Gender::Male`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "l" | "laki-laki" => Some(Self::Male),
            "f" | "female" | "p" | "perempuan" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Gender::from_label(&value).unwrap_or_default()
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.code().to_string()
    }
}

/// Stool color reported by the parent.
///
/// English display labels are canonical and are what gets persisted. Older
/// records written with Indonesian labels (`Coklat`, `Putih Pucat`, ...) are
/// translated on read; unknown labels fall back to [`StoolColor::Brown`], which
/// never contributes to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoolColor {
    #[default]
    Brown,
    Yellow,
    Green,
    PaleWhite,
    Black,
    Bloody,
}

impl StoolColor {
    pub const ALL: [StoolColor; 6] = [
        StoolColor::Brown,
        StoolColor::Yellow,
        StoolColor::Green,
        StoolColor::PaleWhite,
        StoolColor::Black,
        StoolColor::Bloody,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StoolColor::Brown => "Brown",
            StoolColor::Yellow => "Yellow",
            StoolColor::Green => "Green",
            StoolColor::PaleWhite => "Pale White",
            StoolColor::Black => "Black",
            StoolColor::Bloody => "Bloody",
        }
    }

    /// Translate an English or legacy Indonesian label, ignoring case, spaces and underscores.
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "brown" | "coklat" | "cokelat" => Some(Self::Brown),
            "yellow" | "kuning" => Some(Self::Yellow),
            "green" | "hijau" => Some(Self::Green),
            "palewhite" | "putihpucat" => Some(Self::PaleWhite),
            "black" | "hitam" => Some(Self::Black),
            "bloody" | "berdarah" => Some(Self::Bloody),
            _ => None,
        }
    }

    /// Colors that point at bleeding or a blocked bile duct.
    pub fn is_alarming(self) -> bool {
        matches!(
            self,
            StoolColor::Black | StoolColor::Bloody | StoolColor::PaleWhite
        )
    }
}

impl From<String> for StoolColor {
    fn from(value: String) -> Self {
        StoolColor::from_label(&value).unwrap_or_default()
    }
}

impl From<StoolColor> for String {
    fn from(value: StoolColor) -> Self {
        value.label().to_string()
    }
}

/// Symptom checkbox from the form.
///
/// Labels are matched by case-insensitive substring so both the English and
/// the Indonesian form wording land on the same variant. Anything unrecognised
/// is kept verbatim as [`Symptom::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Symptom {
    Cough,
    Rash,
    Flu,
    DifficultBreathing,
    HardToNurse,
    Seizure,
    Other(String),
}

const SYMPTOM_KEYWORDS: [(Symptom, &[&str]); 6] = [
    (Symptom::DifficultBreathing, &["breath", "sesak"]),
    (Symptom::Seizure, &["seizure", "kejang"]),
    (Symptom::Cough, &["cough", "batuk"]),
    (Symptom::Rash, &["rash", "ruam"]),
    (Symptom::Flu, &["flu", "pilek"]),
    (Symptom::HardToNurse, &["nurs", "menyusu"]),
];

impl Symptom {
    /// Every canonical symptom a free-text label names. A label such as
    /// "Kejang dan sesak napas" yields both `Seizure` and
    /// `DifficultBreathing`; a label naming none is kept as `Other`.
    pub fn all_from_label(label: &str) -> Vec<Self> {
        let lowered = label.trim().to_lowercase();
        let matched: Vec<Self> = SYMPTOM_KEYWORDS
            .iter()
            .filter(|(_, keywords)| contains_any(&lowered, keywords))
            .map(|(symptom, _)| symptom.clone())
            .collect();

        if matched.is_empty() {
            vec![Symptom::Other(label.trim().to_string())]
        } else {
            matched
        }
    }

    /// First canonical match for a label, weighted symptoms first.
    pub fn from_label(label: &str) -> Self {
        Symptom::all_from_label(label)
            .into_iter()
            .next()
            .unwrap_or_else(|| Symptom::Other(label.trim().to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            Symptom::Cough => "Cough",
            Symptom::Rash => "Rash",
            Symptom::Flu => "Flu",
            Symptom::DifficultBreathing => "Difficult Breathing",
            Symptom::HardToNurse => "Hard To Nurse",
            Symptom::Seizure => "Seizure",
            Symptom::Other(label) => label,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

impl From<String> for Symptom {
    fn from(value: String) -> Self {
        Symptom::from_label(&value)
    }
}

impl From<Symptom> for String {
    fn from(value: Symptom) -> Self {
        match value {
            Symptom::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// Appetite on the form's 1-5 slider. Construction clamps into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct AppetiteScore(u8);

impl AppetiteScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for AppetiteScore {
    fn default() -> Self {
        Self(3)
    }
}

impl From<i64> for AppetiteScore {
    fn from(value: i64) -> Self {
        AppetiteScore::new(value)
    }
}

impl From<AppetiteScore> for u8 {
    fn from(value: AppetiteScore) -> Self {
        value.0
    }
}

/// Structured observation handed to the scoring engine.
///
/// Serialized field names follow the persisted `inputData` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthObservation {
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, deserialize_with = "clamped_count")]
    pub age_months: u32,
    #[serde(rename = "tempC", default)]
    pub body_temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "clamped_count")]
    pub vomit_count: u32,
    #[serde(default, deserialize_with = "clamped_count")]
    pub wet_diaper_count: u32,
    #[serde(default)]
    pub appetite_score: AppetiteScore,
    #[serde(rename = "stoolFreq", default, deserialize_with = "clamped_count")]
    pub stool_frequency: u32,
    #[serde(default)]
    pub stool_color: StoolColor,
    #[serde(default, deserialize_with = "symptom_labels")]
    pub symptoms: BTreeSet<Symptom>,
}

impl HealthObservation {
    pub fn has_symptom(&self, symptom: &Symptom) -> bool {
        self.symptoms.contains(symptom)
    }
}

/// Stored counts may be negative, fractional, text, or null in older rows.
/// Negatives clamp to 0 and anything unreadable is 0.
fn clamped_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let count = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => return Ok(coerce_count(&text)),
        _ => 0,
    };
    Ok(count.clamp(0, i64::from(u32::MAX)) as u32)
}

fn symptom_labels<'de, D>(deserializer: D) -> Result<BTreeSet<Symptom>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(labels
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .flat_map(Symptom::all_from_label)
        .collect())
}
