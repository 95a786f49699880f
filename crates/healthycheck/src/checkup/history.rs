use std::sync::Arc;

use tracing::{debug, warn};

use super::record::{AssessmentId, AssessmentRecord, AssessmentStore};
use crate::store::{FailureCategory, StoreError};

/// History-list controller with cursor paging.
///
/// Each load is split into a `begin_*` step that decides whether a request is
/// needed and a `finish_*` step that applies its result, so the in-flight
/// flags can be observed between the two. The async `refresh` and `load_more`
/// run both halves against the store.
pub struct HistoryPager<S> {
    store: Arc<S>,
    page_size: usize,
    items: Vec<AssessmentRecord>,
    end_of_list: bool,
    loading: bool,
    loading_more: bool,
    last_failure: Option<FailureCategory>,
}

impl<S> HistoryPager<S>
where
    S: AssessmentStore + 'static,
{
    pub fn new(store: Arc<S>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
            items: Vec::new(),
            end_of_list: false,
            loading: false,
            loading_more: false,
            last_failure: None,
        }
    }

    pub fn items(&self) -> &[AssessmentRecord] {
        &self.items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_end_of_list(&self) -> bool {
        self.end_of_list
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn last_failure(&self) -> Option<FailureCategory> {
        self.last_failure
    }

    /// Returns false when a refresh is already in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Applies a first-page result. Failures keep the current items.
    pub fn finish_refresh(
        &mut self,
        page: Result<Vec<AssessmentRecord>, StoreError>,
    ) -> Result<usize, FailureCategory> {
        self.loading = false;
        match page {
            Ok(page) => {
                self.end_of_list = page.len() < self.page_size;
                self.items = page;
                self.last_failure = None;
                Ok(self.items.len())
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Cursor for the next page, or `None` when loading more is not allowed
    /// (a load is in flight, the list is exhausted, or nothing is loaded yet).
    ///
    /// The cursor is the smallest key shown, not the last row: rows are
    /// ordered by timestamp, which need not agree with key order.
    pub fn begin_load_more(&mut self) -> Option<AssessmentId> {
        if self.loading || self.loading_more || self.end_of_list {
            return None;
        }
        let cursor = self.items.iter().map(|item| &item.id).min()?.clone();
        self.loading_more = true;
        Some(cursor)
    }

    pub fn finish_load_more(
        &mut self,
        page: Result<Vec<AssessmentRecord>, StoreError>,
    ) -> Result<usize, FailureCategory> {
        self.loading_more = false;
        match page {
            Ok(page) => {
                let added = page.len();
                if added < self.page_size {
                    self.end_of_list = true;
                }
                self.items.extend(page);
                self.last_failure = None;
                Ok(added)
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Loads the first page. Returns the number of items now shown.
    pub async fn refresh(&mut self) -> Result<usize, FailureCategory> {
        if !self.begin_refresh() {
            return Ok(self.items.len());
        }
        let page = self.store.fetch_history_page(self.page_size, None).await;
        self.finish_refresh(page)
    }

    /// Appends the next page. Returns the number of records added; 0 when
    /// the call was a no-op.
    pub async fn load_more(&mut self) -> Result<usize, FailureCategory> {
        let Some(cursor) = self.begin_load_more() else {
            return Ok(0);
        };
        debug!(cursor = %cursor.as_str(), "loading older assessments");
        let page = self
            .store
            .fetch_history_page(self.page_size, Some(&cursor))
            .await;
        self.finish_load_more(page)
    }

    /// Collapses the list back to the first page.
    pub async fn show_less(&mut self) -> Result<usize, FailureCategory> {
        self.refresh().await
    }

    /// Puts a freshly saved record at the top of the list.
    pub fn prepend(&mut self, record: AssessmentRecord) {
        if self.items.iter().any(|item| item.id == record.id) {
            return;
        }
        self.items.insert(0, record);
    }

    pub fn remove(&mut self, id: &AssessmentId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != *id);
        self.items.len() != before
    }

    fn record_failure(&mut self, err: StoreError) -> FailureCategory {
        warn!(error = %err, "history load failed");
        let category = err.category();
        self.last_failure = Some(category);
        category
    }
}
