//! Observation intake, IMCI-style risk scoring, and assessment history.

pub mod domain;
pub mod history;
pub mod intake;
pub mod labels;
pub mod record;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AppetiteScore, Gender, HealthObservation, StoolColor, Symptom};
pub use history::HistoryPager;
pub use intake::ObservationForm;
pub use labels::{appetite_label, risk_level_icon, ReasonCategory};
pub use record::{
    arrange_history_page, AssessmentId, AssessmentRecord, AssessmentStore, AssessmentSummary,
    HistoryEntryView, ReasonView,
};
pub use router::checkup_router;
pub use scoring::{
    RiskFactor, RiskLevel, RuleContribution, ScoringEngine, ScoringResult, HIGH_RISK_THRESHOLD,
    MEDIUM_RISK_THRESHOLD, RULES_VERSION,
};
pub use service::{CheckupOutcome, CheckupService, ResultView, SaveStatus};
