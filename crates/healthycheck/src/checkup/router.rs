use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::intake::ObservationForm;
use super::record::{AssessmentId, AssessmentStore, HistoryEntryView};
use super::scoring::RULES_VERSION;
use super::service::{CheckupService, ResultView, SaveStatus};
use crate::error::AppError;

pub(crate) const MAX_PAGE_LIMIT: usize = 50;

/// Router exposing evaluation, saving, history paging, and deletion.
pub fn checkup_router<S>(service: Arc<CheckupService<S>>) -> Router
where
    S: AssessmentStore + 'static,
{
    Router::new()
        .route("/api/v1/checkups/evaluate", post(evaluate_handler))
        .route(
            "/api/v1/checkups",
            post(save_handler::<S>).get(history_handler::<S>),
        )
        .route(
            "/api/v1/checkups/:assessment_id",
            delete(delete_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryQuery {
    pub(crate) limit: Option<usize>,
    pub(crate) cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SavedCheckupResponse {
    #[serde(flatten)]
    result: ResultView,
    save_status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assessment_id: Option<AssessmentId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryPageResponse {
    items: Vec<HistoryEntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<AssessmentId>,
    end_of_list: bool,
    rules_version: &'static str,
}

pub(crate) async fn evaluate_handler(Json(form): Json<ObservationForm>) -> Response {
    let observation = form.into_observation();
    (StatusCode::OK, Json(ResultView::new(&observation))).into_response()
}

pub(crate) async fn save_handler<S>(
    State(service): State<Arc<CheckupService<S>>>,
    Json(form): Json<ObservationForm>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    let outcome = service
        .evaluate_and_save(form.into_observation(), Utc::now())
        .await;

    let status = if outcome.status == SaveStatus::Saved {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let payload = SavedCheckupResponse {
        result: outcome.view(),
        save_status: outcome.status.label(),
        message: outcome.status.message(),
        assessment_id: outcome.saved.map(|record| record.id),
    };
    (status, Json(payload)).into_response()
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<CheckupService<S>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    let limit = match query.limit {
        Some(0) | None => service.page_size(),
        Some(limit) => limit.min(MAX_PAGE_LIMIT),
    };
    let cursor = query
        .cursor
        .filter(|cursor| !cursor.trim().is_empty())
        .map(AssessmentId);

    match service.history_page(limit, cursor.as_ref()).await {
        Ok(page) => {
            let end_of_list = page.len() < limit;
            let next_cursor = if end_of_list {
                None
            } else {
                page.iter().map(|record| record.id.clone()).min()
            };
            let payload = HistoryPageResponse {
                items: page.iter().map(|record| record.history_view()).collect(),
                next_cursor,
                end_of_list,
                rules_version: RULES_VERSION,
            };
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<CheckupService<S>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    match service.delete(&AssessmentId(assessment_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
