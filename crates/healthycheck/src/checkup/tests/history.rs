use std::sync::Arc;

use super::common::*;
use crate::checkup::{AssessmentId, HistoryPager};
use crate::store::FailureCategory;

fn keys(pager: &HistoryPager<MemoryStore>) -> Vec<String> {
    pager
        .items()
        .iter()
        .map(|record| record.id.as_str().to_string())
        .collect()
}

#[tokio::test]
async fn refresh_loads_newest_first_page() {
    let store = MemoryStore::seeded(7);
    let mut pager = HistoryPager::new(Arc::new(store), 5);

    let shown = pager.refresh().await.expect("refresh succeeds");

    assert_eq!(shown, 5);
    assert_eq!(keys(&pager), vec!["-k007", "-k006", "-k005", "-k004", "-k003"]);
    assert!(!pager.is_end_of_list());
    assert!(!pager.is_loading());
}

#[tokio::test]
async fn short_first_page_marks_end_of_list() {
    let mut pager = HistoryPager::new(Arc::new(MemoryStore::seeded(3)), 5);

    pager.refresh().await.expect("refresh succeeds");

    assert!(pager.is_end_of_list());
    assert_eq!(pager.load_more().await, Ok(0));
}

#[tokio::test]
async fn load_more_uses_smallest_key_as_cursor() {
    let store = MemoryStore::seeded(12);
    let mut pager = HistoryPager::new(Arc::new(store.clone()), 5);
    pager.refresh().await.expect("refresh succeeds");

    let added = pager.load_more().await.expect("second page loads");

    assert_eq!(added, 5);
    assert_eq!(pager.items().len(), 10);
    assert_eq!(pager.items()[5].id.as_str(), "-k007");
    assert_eq!(
        store.page_requests().last(),
        Some(&(5, Some(AssessmentId("-k008".to_string()))))
    );

    let added = pager.load_more().await.expect("third page loads");
    assert_eq!(added, 2);
    assert!(pager.is_end_of_list());
    assert_eq!(pager.items().last().map(|r| r.id.as_str()), Some("-k001"));
}

#[tokio::test]
async fn cursor_is_smallest_key_when_clocks_disagree() {
    let store = MemoryStore::with_skewed_clock();
    let mut pager = HistoryPager::new(Arc::new(store.clone()), 3);
    pager.refresh().await.expect("refresh succeeds");
    assert_eq!(keys(&pager), vec!["-k006", "-k004", "-k005"]);

    pager.load_more().await.expect("second page loads");

    assert_eq!(
        store.page_requests().last(),
        Some(&(3, Some(AssessmentId("-k004".to_string()))))
    );
    assert_eq!(
        keys(&pager),
        vec!["-k006", "-k004", "-k005", "-k003", "-k002", "-k001"]
    );
}

#[tokio::test]
async fn exact_multiple_needs_one_empty_page_to_finish() {
    let mut pager = HistoryPager::new(Arc::new(MemoryStore::seeded(5)), 5);
    pager.refresh().await.expect("refresh succeeds");
    assert!(!pager.is_end_of_list());

    assert_eq!(pager.load_more().await, Ok(0));
    assert!(pager.is_end_of_list());
    assert_eq!(pager.items().len(), 5);
}

#[tokio::test]
async fn load_more_is_a_no_op_when_empty_or_in_flight() {
    let store = MemoryStore::seeded(8);
    let mut pager = HistoryPager::new(Arc::new(store.clone()), 5);

    assert!(pager.begin_load_more().is_none());

    pager.refresh().await.expect("refresh succeeds");
    let cursor = pager.begin_load_more().expect("cursor available");
    assert_eq!(cursor.as_str(), "-k004");
    assert!(pager.is_loading_more());
    assert!(pager.begin_load_more().is_none());

    assert!(pager.begin_refresh());
    assert!(!pager.begin_refresh());
    assert_eq!(store.page_requests().len(), 1);
}

#[tokio::test]
async fn show_less_collapses_to_first_page() {
    let mut pager = HistoryPager::new(Arc::new(MemoryStore::seeded(12)), 5);
    pager.refresh().await.expect("refresh succeeds");
    pager.load_more().await.expect("second page loads");
    assert_eq!(pager.items().len(), 10);

    pager.show_less().await.expect("collapse succeeds");

    assert_eq!(pager.items().len(), 5);
    assert!(!pager.is_end_of_list());
}

#[tokio::test]
async fn failures_keep_items_and_record_category() {
    let mut pager = HistoryPager::new(Arc::new(MemoryStore::seeded(6)), 5);
    pager.refresh().await.expect("refresh succeeds");

    let failure = pager.finish_refresh(Err(crate::store::StoreError::Connection(
        "timed out".to_string(),
    )));

    assert_eq!(failure, Err(FailureCategory::NoConnection));
    assert_eq!(pager.items().len(), 5);
    assert_eq!(pager.last_failure(), Some(FailureCategory::NoConnection));

    pager.refresh().await.expect("refresh succeeds");
    assert!(pager.last_failure().is_none());
}

#[tokio::test]
async fn failing_store_reports_server_category() {
    let mut pager = HistoryPager::new(Arc::new(FailingStore::Status(503)), 5);

    assert_eq!(pager.refresh().await, Err(FailureCategory::Server(503)));
    assert!(pager.items().is_empty());
    assert!(!pager.is_loading());
}

#[tokio::test]
async fn prepend_and_remove_edit_the_visible_list() {
    let mut pager = HistoryPager::new(Arc::new(MemoryStore::seeded(2)), 5);
    pager.refresh().await.expect("refresh succeeds");

    let fresh = stored_record("-z100", 99_000);
    pager.prepend(fresh.clone());
    pager.prepend(fresh);
    assert_eq!(keys(&pager), vec!["-z100", "-k002", "-k001"]);

    assert!(pager.remove(&AssessmentId("-k002".to_string())));
    assert!(!pager.remove(&AssessmentId("-missing".to_string())));
    assert_eq!(keys(&pager), vec!["-z100", "-k001"]);
}
