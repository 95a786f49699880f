//! Health-education articles served from the remote store.

mod feed;
pub mod router;

pub use feed::ArticleFeed;
pub use router::article_router;

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::store::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "id_text")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source_url: String,
}

/// Article ids are written by hand in the store and show up as either
/// strings or numbers.
fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

/// Position of an article in the feed, taken from its id. Ids that are not
/// an index select the first article.
pub fn article_index(id: &str) -> usize {
    id.trim().parse().unwrap_or(0)
}

/// Read access to the article feed.
pub trait ArticleSource: Send + Sync {
    fn fetch_articles(&self) -> impl Future<Output = Result<Vec<Article>, StoreError>> + Send;

    fn fetch_article_detail(
        &self,
        index: usize,
    ) -> impl Future<Output = Result<Article, StoreError>> + Send;
}
