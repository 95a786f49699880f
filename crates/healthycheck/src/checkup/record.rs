use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::HealthObservation;
use super::labels::{appetite_label, ReasonCategory};
use super::scoring::{RiskLevel, ScoringEngine, ScoringResult};
use crate::store::StoreError;

/// Key assigned by the store when an assessment is saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl AssessmentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Persisted body of an assessment, in the store's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub short_recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_data: Option<HealthObservation>,
}

impl AssessmentSummary {
    pub fn new(
        result: &ScoringResult,
        observation: Option<HealthObservation>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: recorded_at,
            risk_level: result.level,
            risk_score: result.score,
            short_recommendation: result.recommendation.clone(),
            input_data: observation,
        }
    }
}

/// Stored assessment together with its store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    #[serde(flatten)]
    pub summary: AssessmentSummary,
}

impl AssessmentRecord {
    /// Reasons are not persisted; records that embed their observation get
    /// them back by scoring it again.
    pub fn rescore(&self) -> Option<ScoringResult> {
        self.summary.input_data.as_ref().map(ScoringEngine::evaluate)
    }

    pub fn history_view(&self) -> HistoryEntryView {
        let reasons = self
            .rescore()
            .map(|result| result.reasons)
            .unwrap_or_default()
            .into_iter()
            .map(|reason| {
                let category = ReasonCategory::classify(&reason);
                ReasonView {
                    text: reason,
                    category,
                    icon: category.icon(),
                }
            })
            .collect();

        HistoryEntryView {
            id: self.id.clone(),
            timestamp: self.summary.timestamp.timestamp_millis(),
            recorded_at: self.summary.timestamp.to_rfc3339(),
            risk_level: self.summary.risk_level,
            risk_score: self.summary.risk_score,
            short_recommendation: self.summary.short_recommendation.clone(),
            appetite: self
                .summary
                .input_data
                .as_ref()
                .map(|input| appetite_label(input.appetite_score.value())),
            reasons,
            input_data: self.summary.input_data.clone(),
        }
    }
}

/// History row as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub id: AssessmentId,
    pub timestamp: i64,
    pub recorded_at: String,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub short_recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appetite: Option<String>,
    pub reasons: Vec<ReasonView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<HealthObservation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasonView {
    pub text: String,
    pub category: ReasonCategory,
    pub icon: &'static str,
}

/// Remote persistence for assessments. Pages come back newest first and hold
/// only records strictly older than `cursor`.
pub trait AssessmentStore: Send + Sync {
    fn save_assessment(
        &self,
        summary: &AssessmentSummary,
    ) -> impl Future<Output = Result<AssessmentId, StoreError>> + Send;

    fn fetch_history_page(
        &self,
        limit: usize,
        cursor: Option<&AssessmentId>,
    ) -> impl Future<Output = Result<Vec<AssessmentRecord>, StoreError>> + Send;

    fn delete_assessment(
        &self,
        id: &AssessmentId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Cuts a history page out of the records a store handed back: keys strictly
/// below `cursor`, the `limit` highest keys, ordered newest first.
pub fn arrange_history_page(
    mut records: Vec<AssessmentRecord>,
    limit: usize,
    cursor: Option<&AssessmentId>,
) -> Vec<AssessmentRecord> {
    if let Some(cursor) = cursor {
        records.retain(|record| record.id < *cursor);
    }
    records.sort_by(|a, b| b.id.cmp(&a.id));
    records.truncate(limit);
    records.sort_by(|a, b| {
        b.summary
            .timestamp
            .cmp(&a.summary.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
    records
}
