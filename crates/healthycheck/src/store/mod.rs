//! HTTP client for the Firebase-style JSON document store that holds the
//! article feed and the assessment history.

mod error;

pub use error::{FailureCategory, StoreError};

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::articles::{Article, ArticleSource};
use crate::checkup::{
    arrange_history_page, AssessmentId, AssessmentRecord, AssessmentStore, AssessmentSummary,
};
use crate::config::{ConfigError, StoreConfig};

const ASSESSMENTS_PATH: &str = "health_assessments";
const ARTICLES_PATH: &str = "articles";

/// Client for the remote store. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArticleCollection {
    List(Vec<Option<Article>>),
    Keyed(BTreeMap<String, Option<Article>>),
}

impl ArticleCollection {
    fn into_articles(self) -> Vec<Article> {
        match self {
            ArticleCollection::List(items) => items.into_iter().flatten().collect(),
            ArticleCollection::Keyed(items) => {
                let mut keyed: Vec<(String, Article)> = items
                    .into_iter()
                    .filter_map(|(key, article)| article.map(|article| (key, article)))
                    .collect();
                keyed.sort_by_key(|(key, _)| (key.parse::<usize>().unwrap_or(usize::MAX), key.clone()));
                keyed.into_iter().map(|(_, article)| article).collect()
            }
        }
    }
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from configuration; fails when no store URL is configured.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let base_url = config.require_base_url()?;
        Self::new(base_url, config.timeout)
            .map_err(|_| ConfigError::InvalidStoreUrl(base_url.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request.send().await.map_err(StoreError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

fn valid_key(id: &AssessmentId) -> bool {
    let key = id.as_str();
    !key.is_empty() && !key.contains(['/', '.', '#', '$', '[', ']'])
}

impl AssessmentStore for RemoteStore {
    async fn save_assessment(&self, summary: &AssessmentSummary) -> Result<AssessmentId, StoreError> {
        let request = self
            .client
            .post(self.endpoint(ASSESSMENTS_PATH))
            .json(summary);
        let created: PushResponse = self.read(request).await?;
        debug!(id = %created.name, "assessment stored");
        Ok(AssessmentId(created.name))
    }

    async fn fetch_history_page(
        &self,
        limit: usize,
        cursor: Option<&AssessmentId>,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        // endAt is inclusive, so one extra row makes room for the cursor itself
        let fetch_limit = if cursor.is_some() { limit + 1 } else { limit };
        let mut request = self.client.get(self.endpoint(ASSESSMENTS_PATH)).query(&[
            ("orderBy", "\"$key\"".to_string()),
            ("limitToLast", fetch_limit.to_string()),
        ]);
        if let Some(cursor) = cursor {
            request = request.query(&[("endAt", format!("\"{}\"", cursor.as_str()))]);
        }

        let body: Option<BTreeMap<String, serde_json::Value>> = self.read(request).await?;
        let records = body
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| {
                match serde_json::from_value::<AssessmentSummary>(value) {
                    Ok(summary) => Some(AssessmentRecord {
                        id: AssessmentId(key),
                        summary,
                    }),
                    Err(err) => {
                        warn!(%key, error = %err, "skipping undecodable assessment");
                        None
                    }
                }
            })
            .collect();

        let page = arrange_history_page(records, limit, cursor);
        debug!(count = page.len(), "history page fetched");
        Ok(page)
    }

    async fn delete_assessment(&self, id: &AssessmentId) -> Result<(), StoreError> {
        if !valid_key(id) {
            return Err(StoreError::NotFound);
        }
        let path = format!("{ASSESSMENTS_PATH}/{}", id.as_str());
        self.send(self.client.delete(self.endpoint(&path))).await?;
        debug!(id = %id.as_str(), "assessment deleted");
        Ok(())
    }
}

impl ArticleSource for RemoteStore {
    async fn fetch_articles(&self) -> Result<Vec<Article>, StoreError> {
        let body: Option<ArticleCollection> = self
            .read(self.client.get(self.endpoint(ARTICLES_PATH)))
            .await?;
        Ok(body.map(ArticleCollection::into_articles).unwrap_or_default())
    }

    async fn fetch_article_detail(&self, index: usize) -> Result<Article, StoreError> {
        let path = format!("{ARTICLES_PATH}/{index}");
        let body: Option<Article> = self.read(self.client.get(self.endpoint(&path))).await?;
        body.ok_or(StoreError::NotFound)
    }
}
