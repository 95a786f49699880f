use std::sync::Arc;

use tracing::{info, warn};

use super::{article_index, Article, ArticleSource};
use crate::store::StoreError;

/// Article-list controller.
pub struct ArticleFeed<A> {
    source: Arc<A>,
    articles: Vec<Article>,
    loading: bool,
    error_message: Option<String>,
    selected: Option<Article>,
}

impl<A> ArticleFeed<A>
where
    A: ArticleSource + 'static,
{
    pub fn new(source: Arc<A>) -> Self {
        Self {
            source,
            articles: Vec::new(),
            loading: false,
            error_message: None,
            selected: None,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn selected(&self) -> Option<&Article> {
        self.selected.as_ref()
    }

    /// Reloads the list. On failure the previous articles stay visible and
    /// the error message is set.
    pub async fn load(&mut self) -> Result<usize, StoreError> {
        self.loading = true;
        self.error_message = None;
        let fetched = self.source.fetch_articles().await;
        self.loading = false;

        match fetched {
            Ok(articles) => {
                info!(count = articles.len(), "articles loaded");
                self.articles = articles;
                Ok(self.articles.len())
            }
            Err(err) => {
                warn!(error = %err, "article load failed");
                self.error_message = Some(feed_error_message(&err));
                Err(err)
            }
        }
    }

    /// Selects an already loaded article by id.
    pub fn select(&mut self, id: &str) -> Option<&Article> {
        self.selected = self.articles.get(article_index(id)).cloned();
        self.selected.as_ref()
    }

    /// Fetches one article from the store and selects it.
    pub async fn open(&mut self, id: &str) -> Result<&Article, StoreError> {
        let index = article_index(id);
        self.loading = true;
        let fetched = self.source.fetch_article_detail(index).await;
        self.loading = false;

        match fetched {
            Ok(article) => {
                self.error_message = None;
                let selected = self.selected.insert(article);
                Ok(&*selected)
            }
            Err(err) => {
                warn!(index, error = %err, "article detail failed");
                self.error_message = Some(feed_error_message(&err));
                Err(err)
            }
        }
    }
}

pub(crate) fn feed_error_message(err: &StoreError) -> String {
    match err {
        StoreError::Connection(_) => "Connection problem. Check your internet connection.".to_string(),
        other => format!("Failed to load data: {other}"),
    }
}
