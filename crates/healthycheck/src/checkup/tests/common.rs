use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::checkup::{
    arrange_history_page, checkup_router, AppetiteScore, AssessmentId, AssessmentRecord,
    AssessmentStore, AssessmentSummary, CheckupService, Gender, HealthObservation, ScoringEngine,
    StoolColor, Symptom,
};
use crate::store::StoreError;

/// Observation with nothing that triggers a rule.
pub(super) fn nominal_observation() -> HealthObservation {
    HealthObservation {
        gender: Gender::Female,
        age_months: 12,
        body_temperature_c: Some(37.0),
        vomit_count: 0,
        wet_diaper_count: 6,
        appetite_score: AppetiteScore::new(4),
        stool_frequency: 2,
        stool_color: StoolColor::Brown,
        symptoms: Default::default(),
    }
}

pub(super) fn high_risk_observation() -> HealthObservation {
    HealthObservation {
        gender: Gender::Male,
        age_months: 2,
        body_temperature_c: Some(38.2),
        vomit_count: 4,
        wet_diaper_count: 1,
        appetite_score: AppetiteScore::new(1),
        stool_frequency: 1,
        stool_color: StoolColor::Black,
        symptoms: [Symptom::Seizure].into_iter().collect(),
    }
}

pub(super) fn at_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().expect("valid timestamp")
}

pub(super) fn stored_record(key: &str, millis: i64) -> AssessmentRecord {
    let observation = nominal_observation();
    let result = ScoringEngine::evaluate(&observation);
    AssessmentRecord {
        id: AssessmentId(key.to_string()),
        summary: AssessmentSummary::new(&result, Some(observation), at_millis(millis)),
    }
}

/// Store keeping records in key order, handing out sequential push keys.
#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<BTreeMap<AssessmentId, AssessmentSummary>>>,
    pub(super) page_requests: Arc<Mutex<Vec<(usize, Option<AssessmentId>)>>>,
}

impl MemoryStore {
    /// Seeds `count` records with keys `-k001`.. and increasing timestamps.
    pub(super) fn seeded(count: usize) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().expect("store mutex poisoned");
            for index in 1..=count {
                let record = stored_record(&format!("-k{index:03}"), 1_000 * index as i64);
                guard.insert(record.id, record.summary);
            }
        }
        store
    }

    /// Six records where `-k005` was written by a device with its clock far
    /// behind, so it sorts last by time while its key is second newest.
    pub(super) fn with_skewed_clock() -> Self {
        let store = Self::seeded(6);
        {
            let mut guard = store.records.lock().expect("store mutex poisoned");
            let skewed = stored_record("-k005", 100);
            guard.insert(skewed.id, skewed.summary);
        }
        store
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    pub(super) fn contains(&self, id: &AssessmentId) -> bool {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .contains_key(id)
    }

    pub(super) fn page_requests(&self) -> Vec<(usize, Option<AssessmentId>)> {
        self.page_requests
            .lock()
            .expect("store mutex poisoned")
            .clone()
    }
}

impl AssessmentStore for MemoryStore {
    async fn save_assessment(&self, summary: &AssessmentSummary) -> Result<AssessmentId, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let id = AssessmentId(format!("-z{:03}", guard.len() + 1));
        guard.insert(id.clone(), summary.clone());
        Ok(id)
    }

    async fn fetch_history_page(
        &self,
        limit: usize,
        cursor: Option<&AssessmentId>,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        self.page_requests
            .lock()
            .expect("store mutex poisoned")
            .push((limit, cursor.cloned()));
        let records = self
            .records
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .map(|(id, summary)| AssessmentRecord {
                id: id.clone(),
                summary: summary.clone(),
            })
            .collect();
        Ok(arrange_history_page(records, limit, cursor))
    }

    async fn delete_assessment(&self, id: &AssessmentId) -> Result<(), StoreError> {
        let removed = self
            .records
            .lock()
            .expect("store mutex poisoned")
            .remove(id);
        removed.map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// Store whose every call fails the same way.
pub(super) enum FailingStore {
    Offline,
    Status(u16),
}

impl FailingStore {
    fn error(&self) -> StoreError {
        match self {
            FailingStore::Offline => StoreError::Connection("connection refused".to_string()),
            FailingStore::Status(status) => StoreError::Status { status: *status },
        }
    }
}

impl AssessmentStore for FailingStore {
    async fn save_assessment(&self, _summary: &AssessmentSummary) -> Result<AssessmentId, StoreError> {
        Err(self.error())
    }

    async fn fetch_history_page(
        &self,
        _limit: usize,
        _cursor: Option<&AssessmentId>,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        Err(self.error())
    }

    async fn delete_assessment(&self, _id: &AssessmentId) -> Result<(), StoreError> {
        Err(self.error())
    }
}

pub(super) fn router_with_store<S>(store: S) -> axum::Router
where
    S: AssessmentStore + 'static,
{
    checkup_router(Arc::new(CheckupService::new(Arc::new(store), 5)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
