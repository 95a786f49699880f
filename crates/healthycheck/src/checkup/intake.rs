use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::domain::{AppetiteScore, Gender, HealthObservation, StoolColor, Symptom};

/// Raw form input exactly as typed by the parent.
///
/// Every field is text; JSON callers may send numbers instead and they are
/// read back as text. [`ObservationForm::into_observation`] applies the coercion
/// policy: anything that does not parse becomes `0` (or "no reading" for the
/// temperature) rather than being rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age_months: String,
    #[serde(default, alias = "tempC", deserialize_with = "lenient_text")]
    pub temperature_c: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub vomit_count: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wet_diaper_count: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub appetite_score: String,
    #[serde(default, alias = "stoolFreq", deserialize_with = "lenient_text")]
    pub stool_frequency: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub stool_color: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

impl ObservationForm {
    pub fn into_observation(self) -> HealthObservation {
        HealthObservation {
            gender: Gender::from_label(&self.gender).unwrap_or_default(),
            age_months: coerce_count(&self.age_months),
            body_temperature_c: coerce_temperature(&self.temperature_c),
            vomit_count: coerce_count(&self.vomit_count),
            wet_diaper_count: coerce_count(&self.wet_diaper_count),
            appetite_score: coerce_appetite(&self.appetite_score),
            stool_frequency: coerce_count(&self.stool_frequency),
            stool_color: StoolColor::from_label(&self.stool_color).unwrap_or_default(),
            symptoms: self
                .symptoms
                .iter()
                .map(|label| label.trim())
                .filter(|label| !label.is_empty())
                .flat_map(Symptom::all_from_label)
                .collect(),
        }
    }
}

impl From<ObservationForm> for HealthObservation {
    fn from(form: ObservationForm) -> Self {
        form.into_observation()
    }
}

/// Whole-number field: unparsable or negative input becomes 0.
pub fn coerce_count(raw: &str) -> u32 {
    let raw = raw.trim();
    let parsed = raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .map(|value| value as i64)
    });

    parsed
        .map(|value| value.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

/// Temperature in °C: blank, unparsable, or non-finite input means no reading.
pub fn coerce_temperature(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Slider value, truncated like the form does; unparsable is 0, then clamped into 1..=5.
pub fn coerce_appetite(raw: &str) -> AppetiteScore {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
        .unwrap_or(0);
    AppetiteScore::new(value)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkup::scoring::{RiskLevel, ScoringEngine};
    use serde_json::json;

    #[test]
    fn unparsable_numbers_become_zero() {
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("-4"), 0);
        assert_eq!(coerce_count(" 7 "), 7);
        assert_eq!(coerce_count("3.0"), 3);
        assert_eq!(coerce_count("2.5"), 0);
    }

    #[test]
    fn temperature_is_absent_when_unparsable() {
        assert_eq!(coerce_temperature("38.5"), Some(38.5));
        assert_eq!(coerce_temperature(""), None);
        assert_eq!(coerce_temperature("hot"), None);
        assert_eq!(coerce_temperature("NaN"), None);
        assert_eq!(coerce_temperature("inf"), None);
    }

    #[test]
    fn appetite_truncates_and_clamps() {
        assert_eq!(coerce_appetite("3.9").value(), 3);
        assert_eq!(coerce_appetite("").value(), 1);
        assert_eq!(coerce_appetite("12").value(), 5);
    }

    #[test]
    fn form_accepts_numbers_and_strings() {
        let form: ObservationForm = serde_json::from_value(json!({
            "gender": "F",
            "ageMonths": 14,
            "tempC": "39.1",
            "vomitCount": null,
            "wetDiaperCount": "two",
            "appetiteScore": 2.0,
            "stoolFreq": 3,
            "stoolColor": "Hitam",
            "symptoms": ["Sesak Napas", " ", "Batuk", "batuk"]
        }))
        .expect("form decodes");

        let observation = form.into_observation();

        assert_eq!(observation.gender, Gender::Female);
        assert_eq!(observation.age_months, 14);
        assert_eq!(observation.body_temperature_c, Some(39.1));
        assert_eq!(observation.vomit_count, 0);
        assert_eq!(observation.wet_diaper_count, 0);
        assert_eq!(observation.appetite_score.value(), 2);
        assert_eq!(observation.stool_frequency, 3);
        assert_eq!(observation.stool_color, StoolColor::Black);
        assert_eq!(observation.symptoms.len(), 2);
        assert!(observation.has_symptom(&Symptom::DifficultBreathing));
        assert!(observation.has_symptom(&Symptom::Cough));
    }

    #[test]
    fn one_label_can_name_several_symptoms() {
        let form: ObservationForm = serde_json::from_value(json!({
            "ageMonths": "24",
            "wetDiaperCount": "6",
            "appetiteScore": "5",
            "symptoms": ["Kejang dan sesak napas"]
        }))
        .expect("form decodes");

        let observation = form.into_observation();

        assert!(observation.has_symptom(&Symptom::Seizure));
        assert!(observation.has_symptom(&Symptom::DifficultBreathing));

        let result = ScoringEngine::evaluate(&observation);
        assert_eq!(result.score, 8);
        assert_eq!(result.level, RiskLevel::High);
        assert_eq!(result.reasons, vec!["difficulty breathing", "febrile seizure"]);
    }

    #[test]
    fn unknown_labels_fall_back_to_form_defaults() {
        let observation = ObservationForm {
            gender: "?".to_string(),
            stool_color: "mauve".to_string(),
            ..ObservationForm::default()
        }
        .into_observation();

        assert_eq!(observation.gender, Gender::Male);
        assert_eq!(observation.stool_color, StoolColor::Brown);
        assert_eq!(observation.body_temperature_c, None);
    }
}
