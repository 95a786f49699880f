mod policy;
mod rules;

pub use policy::{RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use rules::{RiskFactor, RuleContribution};

use super::domain::HealthObservation;
use serde::{Deserialize, Serialize};

/// Identifies the rule set so results from different weightings are never mixed.
pub const RULES_VERSION: &str = "imci-age-stratified-v2";

/// Stateless IMCI-style evaluator. Pure and total: it never fails and never
/// touches I/O, so it can be called from any thread.
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn evaluate(observation: &HealthObservation) -> ScoringResult {
        ScoringResult::from_contributions(&Self::breakdown(observation))
    }

    /// Triggered rules in evaluation order, with their weights.
    pub fn breakdown(observation: &HealthObservation) -> Vec<RuleContribution> {
        rules::triggered_rules(observation)
    }
}

/// Score, risk band, reasons in rule order, and the level's recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: u32,
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    pub recommendation: String,
}

impl ScoringResult {
    pub fn from_contributions(contributions: &[RuleContribution]) -> Self {
        let score = contributions.iter().map(|rule| rule.weight).sum();
        let level = RiskLevel::from_score(score);

        Self {
            score,
            level,
            reasons: contributions
                .iter()
                .map(|rule| rule.reason.clone())
                .collect(),
            recommendation: level.recommendation().to_string(),
        }
    }
}
