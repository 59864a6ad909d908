//! End-to-end controller scenarios over a scripted source.
//!
//! Timing-sensitive tests run under paused time: `advance` moves the
//! virtual clock explicitly, while `pump().await` relies on auto-advance
//! to reach the next settled event.

use std::sync::Arc;
use std::time::Duration;

use repomark_core::bookmarks::{BOOKMARKS_KEY, BookmarkStore};
use repomark_core::controller::{Phase, SearchController};
use repomark_core::storage::{MemoryStorage, Storage};
use tokio::task::yield_now;
use tokio::time::advance;

use crate::common::stub_source::StubSource;
use crate::common::test_utils::{FailingStorage, repo, seeded_bookmarks};

const DELAY: Duration = Duration::from_millis(350);

fn controller_over(stub: Arc<StubSource>) -> SearchController {
    let bookmarks = BookmarkStore::load(Arc::new(MemoryStorage::new()));
    SearchController::new(stub, bookmarks, DELAY)
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_dispatches_single_search() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("react", vec![repo(1, "facebook/react")]);
    let mut controller = controller_over(Arc::clone(&stub));

    controller.set_query("re");
    yield_now().await;
    advance(Duration::from_millis(100)).await;
    controller.set_query("react");

    controller.pump().await; // settled query
    controller.pump().await; // search outcome

    assert_eq!(stub.search_calls(), 1);
    assert_eq!(stub.searched_queries(), vec!["react"]);
    assert_eq!(*controller.phase(), Phase::Ready);
    assert_eq!(controller.repos().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_inflight_search_cancelled_when_query_moves_on() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("foo", vec![repo(10, "x/foo")]);
    stub.set_search_latency("foo", Duration::from_millis(1000));
    stub.on_search("bar", vec![repo(20, "y/bar")]);
    let mut controller = controller_over(Arc::clone(&stub));

    controller.set_query("foo");
    controller.pump().await; // "foo" settles, slow fetch in flight
    assert_eq!(*controller.phase(), Phase::Searching);

    controller.set_query("bar");
    controller.pump().await; // "bar" settles, supersedes "foo"
    controller.pump().await; // "bar" outcome

    assert_eq!(*controller.phase(), Phase::Ready);
    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![20]);
    assert_eq!(stub.searched_queries(), vec!["foo", "bar"]);

    // The cancelled fetch never reports back.
    assert!(!controller.poll());
    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![20]);
}

#[tokio::test(start_paused = true)]
async fn test_queued_stale_outcome_discarded() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("foo", vec![repo(10, "x/foo")]);
    stub.set_search_latency("foo", Duration::from_millis(100));
    stub.on_search("bar", vec![repo(20, "y/bar")]);
    stub.set_search_latency("bar", Duration::from_millis(100));
    let mut controller = controller_over(Arc::clone(&stub));

    controller.set_query("foo");
    yield_now().await;
    advance(DELAY).await;
    yield_now().await;
    assert!(controller.poll());
    assert_eq!(*controller.phase(), Phase::Searching);

    // Let the "foo" response land in the channel without applying it.
    advance(Duration::from_millis(100)).await;
    yield_now().await;

    controller.set_query("bar");
    yield_now().await;
    advance(DELAY).await;
    yield_now().await;

    // The settled "bar" supersedes "foo" first; the drain then drops the
    // queued "foo" outcome instead of applying it.
    assert!(controller.poll());
    assert_eq!(*controller.phase(), Phase::Searching);
    assert!(controller.repos().is_empty());

    yield_now().await;
    advance(Duration::from_millis(100)).await;
    yield_now().await;
    assert!(controller.poll());

    assert_eq!(*controller.phase(), Phase::Ready);
    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![20]);
    assert_eq!(stub.searched_queries(), vec!["foo", "bar"]);
}

#[tokio::test(start_paused = true)]
async fn test_batch_lookup_fans_out_concurrently() {
    let stub = Arc::new(StubSource::new());
    stub.on_repo(repo(3, "c/three"));
    stub.on_repo(repo(1, "a/one"));
    stub.on_repo(repo(2, "b/two"));
    stub.set_lookup_latency(3, Duration::from_millis(300));
    stub.set_lookup_latency(1, Duration::from_millis(50));
    stub.set_lookup_latency(2, Duration::from_millis(100));

    let (_storage, bookmarks) = seeded_bookmarks(&[3, 1, 2]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_bookmarked_only(true);
    assert_eq!(*controller.phase(), Phase::LoadingBookmarks);
    assert!(controller.is_loading());

    controller.pump().await;

    assert_eq!(*controller.phase(), Phase::Ready);
    // Persisted order, not completion order.
    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(stub.lookup_calls(), 3);
    assert_eq!(stub.max_concurrent_lookups(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_lookup_dropped_from_batch() {
    let stub = Arc::new(StubSource::new());
    stub.on_repo(repo(1, "a/one"));
    // id 2 stays unregistered and resolves as a 404.

    let (_storage, bookmarks) = seeded_bookmarks(&[1, 2]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_bookmarked_only(true);
    controller.pump().await;

    assert_eq!(*controller.phase(), Phase::Ready);
    assert!(controller.error().is_none());
    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(stub.lookup_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_batch_with_all_lookups_failing_is_not_an_error() {
    let stub = Arc::new(StubSource::new());
    let (_storage, bookmarks) = seeded_bookmarks(&[5, 6]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_bookmarked_only(true);
    controller.pump().await;

    assert_eq!(*controller.phase(), Phase::Ready);
    assert!(controller.visible().is_empty());
    assert!(controller.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_bookmarked_only_with_empty_set_fetches_nothing() {
    let stub = Arc::new(StubSource::new());
    let (_storage, bookmarks) = seeded_bookmarks(&[]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_bookmarked_only(true);

    assert_eq!(*controller.phase(), Phase::NoBookmarks);
    assert_eq!(stub.lookup_calls(), 0);
    assert_eq!(stub.search_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_with_filter_off_keeps_list_and_persists() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("q", vec![repo(1, "a/one"), repo(2, "b/two")]);

    let (storage, bookmarks) = seeded_bookmarks(&[]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_query("q");
    controller.pump().await;
    controller.pump().await;

    controller.toggle_bookmark(&repo(1, "a/one"));

    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(
        storage.read(BOOKMARKS_KEY).unwrap().as_deref(),
        Some("[1]")
    );
    // No refetch was triggered by the toggle.
    assert_eq!(stub.search_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_surfaces_message_and_recovers() {
    let stub = Arc::new(StubSource::new());
    stub.fail_search("rust", 403, "Forbidden");
    stub.on_search("tokio", vec![repo(1, "tokio-rs/tokio")]);
    let mut controller = controller_over(Arc::clone(&stub));

    controller.set_query("rust");
    controller.pump().await;
    controller.pump().await;

    assert_eq!(
        controller.error(),
        Some("GitHub API error: 403 Forbidden")
    );
    assert!(controller.repos().is_empty());
    assert!(!controller.is_loading());

    // A new query clears the error and fetches normally.
    controller.set_query("tokio");
    controller.pump().await;
    assert!(controller.error().is_none());
    controller.pump().await;

    assert_eq!(*controller.phase(), Phase::Ready);
    assert_eq!(controller.repos().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_flag_change_supersedes_inflight_search() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("slow", vec![repo(9, "s/slow")]);
    stub.set_search_latency("slow", Duration::from_millis(1000));

    let (_storage, bookmarks) = seeded_bookmarks(&[1]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_query("slow");
    controller.pump().await;
    assert_eq!(*controller.phase(), Phase::Searching);

    // The query is still non-empty, so the flag change re-dispatches the
    // search under a fresh liveness token.
    controller.set_bookmarked_only(true);
    assert_eq!(*controller.phase(), Phase::Searching);

    controller.pump().await;

    assert_eq!(*controller.phase(), Phase::Ready);
    assert_eq!(stub.searched_queries(), vec!["slow", "slow"]);
    assert_eq!(controller.repos().len(), 1);
    // The result is shown through the bookmark filter, and id 9 is not
    // bookmarked.
    assert!(controller.visible().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clearing_query_in_bookmarked_view_loads_bookmarks() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("x", vec![repo(7, "g/seven")]);
    stub.on_repo(repo(1, "a/one"));

    let (_storage, bookmarks) = seeded_bookmarks(&[1]);
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_query("x");
    controller.pump().await;
    controller.pump().await;
    assert_eq!(controller.repos().len(), 1);

    controller.set_bookmarked_only(true);
    controller.pump().await; // refetched "x"
    assert!(controller.visible().is_empty());

    controller.set_query("");
    controller.pump().await; // "" settles, batch starts
    assert_eq!(*controller.phase(), Phase::LoadingBookmarks);
    controller.pump().await;

    assert_eq!(*controller.phase(), Phase::Ready);
    let ids: Vec<u64> = controller.visible().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_persistence_failure_keeps_session_state() {
    let stub = Arc::new(StubSource::new());
    stub.on_search("q", vec![repo(1, "a/one"), repo(2, "b/two")]);

    let bookmarks = BookmarkStore::load(Arc::new(FailingStorage));
    let mut controller = SearchController::new(stub.clone(), bookmarks, DELAY);

    controller.set_query("q");
    controller.pump().await;
    controller.pump().await;

    controller.toggle_bookmark(&repo(1, "a/one"));

    // The write failed silently; the session still reflects the toggle.
    assert!(controller.is_bookmarked(1));
    assert!(controller.error().is_none());
    assert_eq!(controller.visible().len(), 2);

    controller.toggle_bookmark(&repo(1, "a/one"));
    assert!(!controller.is_bookmarked(1));
}
