use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use healthycheck::articles::{article_router, ArticleSource};
use healthycheck::checkup::{checkup_router, AssessmentStore, CheckupService, RULES_VERSION};
use serde_json::json;
use std::sync::Arc;

/// Full API surface over one store: checkups, articles, health and metrics.
pub(crate) fn app_router<S>(store: Arc<S>, page_size: usize) -> axum::Router
where
    S: AssessmentStore + ArticleSource + 'static,
{
    let checkups = Arc::new(CheckupService::new(store.clone(), page_size));

    checkup_router(checkups)
        .merge(article_router(store))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "rules_version": RULES_VERSION }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn test_app(store: InMemoryStore, ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        app_router(Arc::new(store), 5).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let pending = test_app(InMemoryStore::default(), false)
            .oneshot(get("/ready"))
            .await
            .expect("router responds");
        assert_eq!(pending.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = test_app(InMemoryStore::default(), true)
            .oneshot(get("/ready"))
            .await
            .expect("router responds");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_rule_set() {
        let response = test_app(InMemoryStore::default(), true)
            .oneshot(get("/health"))
            .await
            .expect("router responds");

        let body = body_json(response).await;
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["rules_version"], json!(RULES_VERSION));
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let response = test_app(InMemoryStore::default(), true)
            .oneshot(get("/metrics"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"text/plain; version=0.0.4"[..])
        );
    }

    #[tokio::test]
    async fn starter_articles_are_served_offline() {
        let app = test_app(InMemoryStore::default(), true);

        let list = app
            .clone()
            .oneshot(get("/api/v1/articles"))
            .await
            .expect("router responds");
        let body = body_json(list).await;
        assert_eq!(body["count"], json!(3));

        let detail = app
            .clone()
            .oneshot(get("/api/v1/articles/1"))
            .await
            .expect("router responds");
        let body = body_json(detail).await;
        assert_eq!(body["id"], json!("1"));

        let fallback = app
            .oneshot(get("/api/v1/articles/first"))
            .await
            .expect("router responds");
        let body = body_json(fallback).await;
        assert_eq!(body["id"], json!("0"));
    }

    #[tokio::test]
    async fn saved_checkups_show_up_in_history_and_can_be_deleted() {
        let store = InMemoryStore::default();
        let app = test_app(store.clone(), true);

        let saved = app
            .clone()
            .oneshot(
                Request::post("/api/v1/checkups")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "ageMonths": "12", "tempC": "39.5", "wetDiaperCount": "6", "appetiteScore": "4" })
                            .to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(saved.status(), StatusCode::CREATED);
        let id = body_json(saved).await["assessment_id"]
            .as_str()
            .map(str::to_string)
            .expect("id returned");
        assert_eq!(id, "-HC000000000001");

        let history = app
            .clone()
            .oneshot(get("/api/v1/checkups"))
            .await
            .expect("router responds");
        let body = body_json(history).await;
        assert_eq!(body["items"][0]["risk_level"], json!("MEDIUM"));
        assert_eq!(body["items"][0]["reasons"][0]["text"], json!("high fever (≥39°C)"));
        assert_eq!(body["end_of_list"], json!(true));

        let deleted = app
            .oneshot(
                Request::delete(format!("/api/v1/checkups/{id}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.len(), 0);
    }
}
