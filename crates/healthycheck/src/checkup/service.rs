use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::HealthObservation;
use super::labels::{appetite_label, risk_level_icon, ReasonCategory};
use super::record::{AssessmentId, AssessmentRecord, AssessmentStore, AssessmentSummary, ReasonView};
use super::scoring::{RiskLevel, RuleContribution, ScoringEngine, ScoringResult, RULES_VERSION};
use crate::store::{FailureCategory, StoreError};

/// Result-screen controller: scores observations and keeps the store in step.
pub struct CheckupService<S> {
    store: Arc<S>,
    page_size: usize,
}

/// Persistence state shown next to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Deleting,
    Failed(FailureCategory),
}

impl SaveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Deleting => "deleting",
            SaveStatus::Failed(_) => "failed",
        }
    }

    pub fn message(self) -> String {
        match self {
            SaveStatus::Idle => String::new(),
            SaveStatus::Saving => "Saving...".to_string(),
            SaveStatus::Saved => "Saved to history".to_string(),
            SaveStatus::Deleting => "Deleting...".to_string(),
            SaveStatus::Failed(category) => category.status_text(),
        }
    }
}

/// Everything the result screen renders for one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub score: u32,
    pub level: RiskLevel,
    pub level_icon: &'static str,
    pub recommendation: String,
    pub reasons: Vec<ReasonView>,
    pub breakdown: Vec<RuleContribution>,
    pub appetite: String,
    pub rules_version: &'static str,
}

impl ResultView {
    pub fn new(observation: &HealthObservation) -> Self {
        let breakdown = ScoringEngine::breakdown(observation);
        let result = ScoringResult::from_contributions(&breakdown);

        Self {
            score: result.score,
            level: result.level,
            level_icon: risk_level_icon(result.level),
            recommendation: result.recommendation,
            reasons: result
                .reasons
                .into_iter()
                .map(|text| {
                    let category = ReasonCategory::classify(&text);
                    ReasonView {
                        text,
                        category,
                        icon: category.icon(),
                    }
                })
                .collect(),
            breakdown,
            appetite: appetite_label(observation.appetite_score.value()),
            rules_version: RULES_VERSION,
        }
    }
}

/// Outcome of evaluate-then-save. The result is kept even when the save fails.
#[derive(Debug, Clone)]
pub struct CheckupOutcome {
    pub observation: HealthObservation,
    pub result: ScoringResult,
    pub saved: Option<AssessmentRecord>,
    pub status: SaveStatus,
}

impl CheckupOutcome {
    pub fn view(&self) -> ResultView {
        ResultView::new(&self.observation)
    }
}

impl<S> CheckupService<S>
where
    S: AssessmentStore + 'static,
{
    pub fn new(store: Arc<S>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn evaluate(&self, observation: &HealthObservation) -> ScoringResult {
        ScoringEngine::evaluate(observation)
    }

    /// Scores the observation without touching the store.
    pub fn prepare(&self, observation: HealthObservation) -> CheckupOutcome {
        let result = self.evaluate(&observation);
        CheckupOutcome {
            observation,
            result,
            saved: None,
            status: SaveStatus::Idle,
        }
    }

    /// Moves the outcome to `Saving` and returns the summary to persist.
    /// Returns `None` when the outcome is already saved or busy.
    pub fn begin_save(
        &self,
        outcome: &mut CheckupOutcome,
        recorded_at: DateTime<Utc>,
    ) -> Option<AssessmentSummary> {
        if matches!(
            outcome.status,
            SaveStatus::Saving | SaveStatus::Saved | SaveStatus::Deleting
        ) {
            return None;
        }
        outcome.status = SaveStatus::Saving;
        Some(AssessmentSummary::new(
            &outcome.result,
            Some(outcome.observation.clone()),
            recorded_at,
        ))
    }

    pub fn finish_save(
        &self,
        outcome: &mut CheckupOutcome,
        summary: AssessmentSummary,
        saved: Result<AssessmentId, StoreError>,
    ) {
        match saved {
            Ok(id) => {
                info!(id = %id.as_str(), level = outcome.result.level.name(), score = outcome.result.score, "assessment saved");
                outcome.saved = Some(AssessmentRecord { id, summary });
                outcome.status = SaveStatus::Saved;
            }
            Err(err) => {
                warn!(error = %err, "assessment save failed");
                outcome.status = SaveStatus::Failed(err.category());
            }
        }
    }

    /// Persists the summary with the observation embedded. Nothing is retried.
    pub async fn save(&self, outcome: &mut CheckupOutcome, recorded_at: DateTime<Utc>) {
        let Some(summary) = self.begin_save(outcome, recorded_at) else {
            return;
        };
        let saved = self.store.save_assessment(&summary).await;
        self.finish_save(outcome, summary, saved);
    }

    pub async fn evaluate_and_save(
        &self,
        observation: HealthObservation,
        recorded_at: DateTime<Utc>,
    ) -> CheckupOutcome {
        let mut outcome = self.prepare(observation);
        self.save(&mut outcome, recorded_at).await;
        outcome
    }

    pub async fn history_page(
        &self,
        limit: usize,
        cursor: Option<&AssessmentId>,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        let page = self.store.fetch_history_page(limit, cursor).await;
        if let Err(err) = &page {
            warn!(error = %err, cursor = cursor.map(AssessmentId::as_str), "history load failed");
        }
        page
    }

    pub async fn delete(&self, id: &AssessmentId) -> Result<(), StoreError> {
        match self.store.delete_assessment(id).await {
            Ok(()) => {
                info!(id = %id.as_str(), "assessment deleted");
                Ok(())
            }
            Err(err) => {
                warn!(id = %id.as_str(), error = %err, "assessment delete failed");
                Err(err)
            }
        }
    }

    /// Deletes the record an outcome saved, walking its status through
    /// `Deleting`. Outcomes that were never saved are left alone.
    pub async fn discard(&self, outcome: &mut CheckupOutcome) {
        let Some(record) = outcome.saved.as_ref() else {
            return;
        };
        let id = record.id.clone();

        outcome.status = SaveStatus::Deleting;
        match self.delete(&id).await {
            Ok(()) => {
                outcome.saved = None;
                outcome.status = SaveStatus::Idle;
            }
            Err(err) => outcome.status = SaveStatus::Failed(err.category()),
        }
    }
}
