use healthycheck::articles::{Article, ArticleSource};
use healthycheck::checkup::{
    arrange_history_page, AssessmentId, AssessmentRecord, AssessmentStore, AssessmentSummary,
};
use healthycheck::store::StoreError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store used when no remote store is configured. Keys sort in
/// insertion order, like pushed keys do.
#[derive(Clone)]
pub(crate) struct InMemoryStore {
    assessments: Arc<Mutex<BTreeMap<AssessmentId, AssessmentSummary>>>,
    articles: Arc<Vec<Article>>,
    sequence: Arc<AtomicU64>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_articles(starter_articles())
    }
}

impl InMemoryStore {
    pub(crate) fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            assessments: Arc::new(Mutex::new(BTreeMap::new())),
            articles: Arc::new(articles),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    fn assessments(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<AssessmentId, AssessmentSummary>>, StoreError> {
        self.assessments
            .lock()
            .map_err(|_| StoreError::Client("in-memory store lock poisoned".to_string()))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.assessments.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl AssessmentStore for InMemoryStore {
    async fn save_assessment(&self, summary: &AssessmentSummary) -> Result<AssessmentId, StoreError> {
        let id = AssessmentId(format!(
            "-HC{:012}",
            self.sequence.fetch_add(1, Ordering::Relaxed)
        ));
        self.assessments()?.insert(id.clone(), summary.clone());
        Ok(id)
    }

    async fn fetch_history_page(
        &self,
        limit: usize,
        cursor: Option<&AssessmentId>,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        let records = self
            .assessments()?
            .iter()
            .map(|(id, summary)| AssessmentRecord {
                id: id.clone(),
                summary: summary.clone(),
            })
            .collect();
        Ok(arrange_history_page(records, limit, cursor))
    }

    async fn delete_assessment(&self, id: &AssessmentId) -> Result<(), StoreError> {
        self.assessments()?
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

impl ArticleSource for InMemoryStore {
    async fn fetch_articles(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.articles.as_ref().clone())
    }

    async fn fetch_article_detail(&self, index: usize) -> Result<Article, StoreError> {
        self.articles.get(index).cloned().ok_or(StoreError::NotFound)
    }
}

fn article(id: usize, title: &str, content: &str, source_url: &str) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        source_url: source_url.to_string(),
    }
}

/// Offline feed so a local run has something to show.
pub(crate) fn starter_articles() -> Vec<Article> {
    vec![
        article(
            0,
            "Danger signs that need a doctor now",
            "Take the child to a health facility straight away if they cannot drink or breastfeed, vomit everything, have had a convulsion, or are unusually sleepy or hard to wake.",
            "https://www.who.int/teams/maternal-newborn-child-adolescent-health-and-ageing/child-health/integrated-management-of-childhood-illness",
        ),
        article(
            1,
            "Fever in babies under three months",
            "A temperature of 38°C or more in a baby younger than three months is always a reason to see a doctor the same day, even if the baby otherwise seems well.",
            "https://www.nhs.uk/conditions/fever-in-children/",
        ),
        article(
            2,
            "Keeping a child with diarrhoea hydrated",
            "Give extra fluids and oral rehydration solution after every loose stool, keep breastfeeding, and watch for fewer wet diapers, which is an early sign of dehydration.",
            "https://www.who.int/news-room/fact-sheets/detail/diarrhoeal-disease",
        ),
    ]
}
