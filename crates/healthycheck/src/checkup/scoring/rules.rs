use serde::{Deserialize, Serialize};

use super::super::domain::{HealthObservation, Symptom};

/// Infants younger than this are scored on the neonatal temperature band.
pub(crate) const NEONATAL_AGE_MONTHS: u32 = 3;
/// Below this age dry diapers weigh more.
pub(crate) const YOUNG_INFANT_AGE_MONTHS: u32 = 6;

pub(crate) const FEVER_C: f64 = 38.0;
pub(crate) const HIGH_FEVER_C: f64 = 39.0;
pub(crate) const HYPOTHERMIA_C: f64 = 36.5;

pub(crate) const REPEATED_VOMITING: u32 = 3;
pub(crate) const LOW_WET_DIAPERS: u32 = 2;
pub(crate) const POOR_APPETITE: u8 = 2;

/// Clinical area a triggered rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Temperature,
    Vomiting,
    Dehydration,
    Appetite,
    StoolColor,
    Breathing,
    Seizure,
}

/// One triggered rule: its weight and the reason shown to the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub factor: RiskFactor,
    pub weight: u32,
    pub reason: String,
}

impl RuleContribution {
    fn new(factor: RiskFactor, weight: u32, reason: impl Into<String>) -> Self {
        Self {
            factor,
            weight,
            reason: reason.into(),
        }
    }
}

/// Runs every rule in evaluation order and keeps the ones that fired.
pub(crate) fn triggered_rules(observation: &HealthObservation) -> Vec<RuleContribution> {
    [
        temperature(observation),
        vomiting(observation),
        dehydration(observation),
        appetite(observation),
        stool_color(observation),
        breathing(observation),
        seizure(observation),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn temperature(observation: &HealthObservation) -> Option<RuleContribution> {
    let temp = observation.body_temperature_c?;

    if observation.age_months < NEONATAL_AGE_MONTHS {
        if temp >= FEVER_C {
            Some(RuleContribution::new(
                RiskFactor::Temperature,
                5,
                "fever in infant <3mo is an emergency",
            ))
        } else if temp < HYPOTHERMIA_C {
            Some(RuleContribution::new(
                RiskFactor::Temperature,
                3,
                "hypothermia",
            ))
        } else {
            None
        }
    } else if temp >= HIGH_FEVER_C {
        Some(RuleContribution::new(
            RiskFactor::Temperature,
            3,
            "high fever (≥39°C)",
        ))
    } else if temp >= FEVER_C {
        Some(RuleContribution::new(
            RiskFactor::Temperature,
            1,
            "fever (≥38°C)",
        ))
    } else {
        None
    }
}

fn vomiting(observation: &HealthObservation) -> Option<RuleContribution> {
    (observation.vomit_count >= REPEATED_VOMITING).then(|| {
        RuleContribution::new(RiskFactor::Vomiting, 2, "repeated vomiting ≥3x")
    })
}

fn dehydration(observation: &HealthObservation) -> Option<RuleContribution> {
    if observation.wet_diaper_count > LOW_WET_DIAPERS {
        return None;
    }

    let contribution = if observation.age_months < YOUNG_INFANT_AGE_MONTHS {
        RuleContribution::new(
            RiskFactor::Dehydration,
            3,
            "dry diapers — danger of dehydration in infant",
        )
    } else {
        RuleContribution::new(
            RiskFactor::Dehydration,
            2,
            "low urination — dehydration indicator",
        )
    };
    Some(contribution)
}

fn appetite(observation: &HealthObservation) -> Option<RuleContribution> {
    (observation.appetite_score.value() <= POOR_APPETITE)
        .then(|| RuleContribution::new(RiskFactor::Appetite, 2, "markedly reduced appetite"))
}

fn stool_color(observation: &HealthObservation) -> Option<RuleContribution> {
    let color = observation.stool_color;
    color.is_alarming().then(|| {
        RuleContribution::new(
            RiskFactor::StoolColor,
            3,
            format!("abnormal stool color ({})", color.label()),
        )
    })
}

fn breathing(observation: &HealthObservation) -> Option<RuleContribution> {
    observation
        .has_symptom(&Symptom::DifficultBreathing)
        .then(|| RuleContribution::new(RiskFactor::Breathing, 3, "difficulty breathing"))
}

fn seizure(observation: &HealthObservation) -> Option<RuleContribution> {
    observation
        .has_symptom(&Symptom::Seizure)
        .then(|| RuleContribution::new(RiskFactor::Seizure, 5, "febrile seizure"))
}
