use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::feed::feed_error_message;
use super::{article_index, ArticleSource};
use crate::error::AppError;

pub fn article_router<A>(source: Arc<A>) -> Router
where
    A: ArticleSource + 'static,
{
    Router::new()
        .route("/api/v1/articles", get(list_handler::<A>))
        .route("/api/v1/articles/:index", get(detail_handler::<A>))
        .with_state(source)
}

pub(crate) async fn list_handler<A>(State(source): State<Arc<A>>) -> Response
where
    A: ArticleSource + 'static,
{
    match source.fetch_articles().await {
        Ok(articles) => {
            let payload = json!({
                "count": articles.len(),
                "articles": articles,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => failure(err),
    }
}

pub(crate) async fn detail_handler<A>(
    State(source): State<Arc<A>>,
    Path(index): Path<String>,
) -> Response
where
    A: ArticleSource + 'static,
{
    match source.fetch_article_detail(article_index(&index)).await {
        Ok(article) => (StatusCode::OK, Json(article)).into_response(),
        Err(err) => failure(err),
    }
}

fn failure(err: crate::store::StoreError) -> Response {
    warn!(error = %err, "article request failed");
    let message = feed_error_message(&err);
    let error = AppError::from(err);
    let payload = json!({
        "error": error.to_string(),
        "message": message,
    });
    (error.status_code(), Json(payload)).into_response()
}
