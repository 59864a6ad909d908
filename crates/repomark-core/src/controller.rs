//! The result controller.
//!
//! [`SearchController`] owns the view state: the raw and debounced query,
//! the result list, the bookmarked-only flag and the fetch lifecycle. All
//! mutation happens on the task that owns the controller; fetches run as
//! spawned tasks that report back over a channel and are applied serially
//! via [`SearchController::poll`] or [`SearchController::pump`].
//!
//! Every fetch carries a liveness token. Changing the debounced query or
//! the bookmarked-only flag cancels the previous token, so a result that
//! arrives under a cancelled token is discarded without touching state.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::bookmarks::BookmarkStore;
use crate::debounce::{Debouncer, debounce};
use crate::error::Error;
use crate::github::{Repo, RepoSource};

/// Where the controller currently is in its fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No query and not in the bookmarked-only view; nothing to show.
    Idle,
    /// Bookmarked-only view with an empty bookmark set; nothing to fetch.
    NoBookmarks,
    /// A search for the current debounced query is in flight.
    Searching,
    /// Bookmarked repositories are being looked up.
    LoadingBookmarks,
    /// The last fetch completed and the list is current.
    Ready,
    /// The last fetch failed; the message is user-visible.
    Failed(String),
}

enum FetchKind {
    Search(Result<Vec<Repo>, Error>),
    Batch(Vec<Repo>),
}

struct FetchOutcome {
    token: CancellationToken,
    kind: FetchKind,
}

/// Orchestrates searches, bookmark lookups and the view filter.
pub struct SearchController {
    source: Arc<dyn RepoSource>,
    bookmarks: BookmarkStore,
    query: String,
    debounced_query: String,
    bookmarked_only: bool,
    repos: Vec<Repo>,
    phase: Phase,
    live: CancellationToken,
    query_input: Debouncer<String>,
    settled_queries: watch::Receiver<String>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("query", &self.query)
            .field("debounced_query", &self.debounced_query)
            .field("bookmarked_only", &self.bookmarked_only)
            .field("phase", &self.phase)
            .field("repos", &self.repos.len())
            .finish_non_exhaustive()
    }
}

impl SearchController {
    /// Create a controller over `source` and `bookmarks`.
    ///
    /// `debounce_delay` is the quiet period a query must survive before it
    /// is dispatched. Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(
        source: Arc<dyn RepoSource>,
        bookmarks: BookmarkStore,
        debounce_delay: Duration,
    ) -> Self {
        let (query_input, settled_queries) = debounce(String::new(), debounce_delay);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            source,
            bookmarks,
            query: String::new(),
            debounced_query: String::new(),
            bookmarked_only: false,
            repos: Vec::new(),
            phase: Phase::Idle,
            live: CancellationToken::new(),
            query_input,
            settled_queries,
            outcome_tx,
            outcome_rx,
        }
    }

    /// The raw query as typed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The settled query that drives fetches.
    #[must_use]
    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    /// Whether the bookmarked-only view is active.
    #[must_use]
    pub const fn bookmarked_only(&self) -> bool {
        self.bookmarked_only
    }

    /// The current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Searching | Phase::LoadingBookmarks)
    }

    /// The user-visible error message, when the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The unfiltered result list.
    #[must_use]
    pub fn repos(&self) -> &[Repo] {
        &self.repos
    }

    /// The repositories the current view shows.
    ///
    /// Filtering re-derives membership on every call, so a list that was
    /// already patched filters to itself.
    #[must_use]
    pub fn visible(&self) -> Vec<&Repo> {
        if self.bookmarked_only {
            self.repos
                .iter()
                .filter(|repo| self.bookmarks.contains(repo.id))
                .collect()
        } else {
            self.repos.iter().collect()
        }
    }

    /// The bookmark set.
    #[must_use]
    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    /// Whether `id` is bookmarked.
    #[must_use]
    pub fn is_bookmarked(&self, id: u64) -> bool {
        self.bookmarks.contains(id)
    }

    /// Record a keystroke-level query change.
    ///
    /// Only feeds the debouncer; a fetch happens once the value settles.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.query_input.push(self.query.clone());
    }

    /// Switch the bookmarked-only view on or off.
    pub fn set_bookmarked_only(&mut self, on: bool) {
        if self.bookmarked_only != on {
            self.bookmarked_only = on;
            self.refresh();
        }
    }

    /// Toggle the bookmark on `repo`.
    ///
    /// Mutates the store and, when the bookmarked-only view is active,
    /// patches the list in place: the repository's details are already at
    /// hand, so no refetch happens. Never re-runs the transition rules.
    pub fn toggle_bookmark(&mut self, repo: &Repo) {
        let now_bookmarked = self.bookmarks.toggle(repo.id);
        tracing::debug!(id = repo.id, bookmarked = now_bookmarked, "toggled bookmark");

        if self.bookmarked_only {
            if now_bookmarked {
                if !self.repos.iter().any(|existing| existing.id == repo.id) {
                    self.repos.insert(0, repo.clone());
                }
            } else {
                self.repos.retain(|existing| existing.id != repo.id);
            }
        }
    }

    /// Apply every event that is already pending, without blocking.
    ///
    /// Returns `true` when any state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if self.settled_queries.has_changed().unwrap_or(false) {
            let settled = self.settled_queries.borrow_and_update().clone();
            if settled != self.debounced_query {
                self.apply_settled_query(settled);
                changed = true;
            }
        }

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            let stale = outcome.token.is_cancelled();
            self.apply_outcome(outcome);
            changed |= !stale;
        }

        changed
    }

    /// Wait for the next event and apply it.
    ///
    /// Cancel-safe: state is only mutated after an event has fully
    /// arrived, so this can sit in a `select!` arm.
    pub async fn pump(&mut self) {
        tokio::select! {
            changed = self.settled_queries.changed() => {
                if changed.is_ok() {
                    let settled = self.settled_queries.borrow_and_update().clone();
                    self.apply_settled_query(settled);
                }
            }
            Some(outcome) = self.outcome_rx.recv() => {
                self.apply_outcome(outcome);
            }
        }
    }

    fn apply_settled_query(&mut self, settled: String) {
        if settled == self.debounced_query {
            return;
        }
        tracing::debug!(query = %settled, "debounced query settled");
        self.debounced_query = settled;
        self.refresh();
    }

    /// Re-run the transition rules for the current (debounced query,
    /// bookmarked-only) pair, superseding any in-flight fetch.
    fn refresh(&mut self) {
        self.live.cancel();
        self.live = CancellationToken::new();

        if self.bookmarked_only && self.debounced_query.trim().is_empty() {
            if self.bookmarks.is_empty() {
                self.repos.clear();
                self.phase = Phase::NoBookmarks;
            } else {
                self.phase = Phase::LoadingBookmarks;
                self.spawn_batch_lookup();
            }
        } else if self.debounced_query.trim().is_empty() {
            self.repos.clear();
            self.phase = Phase::Idle;
        } else {
            self.phase = Phase::Searching;
            self.spawn_search();
        }
    }

    fn spawn_search(&self) {
        let source = Arc::clone(&self.source);
        // The query goes out exactly as typed; emptiness was decided on the
        // trimmed form only.
        let query = self.debounced_query.clone();
        let token = self.live.clone();
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                () = token.cancelled() => return,
                result = source.search(&query) => result,
            };
            let _ = tx.send(FetchOutcome {
                token,
                kind: FetchKind::Search(result),
            });
        });
    }

    fn spawn_batch_lookup(&self) {
        let source = Arc::clone(&self.source);
        let ids = self.bookmarks.ids().to_vec();
        let token = self.live.clone();
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let lookups: Vec<_> = ids
                .into_iter()
                .map(|id| {
                    let source = Arc::clone(&source);
                    async move {
                        match source.repo_by_id(id).await {
                            Ok(repo) => Some(repo),
                            Err(e) => {
                                tracing::debug!(id, error = %e, "bookmark lookup dropped");
                                None
                            }
                        }
                    }
                })
                .collect();

            let resolved = tokio::select! {
                () = token.cancelled() => return,
                resolved = join_all(lookups) => resolved,
            };

            let repos: Vec<Repo> = resolved.into_iter().flatten().collect();
            let _ = tx.send(FetchOutcome {
                token,
                kind: FetchKind::Batch(repos),
            });
        });
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.token.is_cancelled() {
            tracing::trace!("discarding stale fetch result");
            return;
        }

        match outcome.kind {
            FetchKind::Search(Ok(repos)) => {
                tracing::debug!(count = repos.len(), "search results applied");
                self.repos = repos;
                self.phase = Phase::Ready;
            }
            FetchKind::Search(Err(e)) => {
                tracing::debug!(error = %e, "search failed");
                self.repos.clear();
                self.phase = Phase::Failed(error_message(&e));
            }
            FetchKind::Batch(repos) => {
                tracing::debug!(count = repos.len(), "bookmark lookups applied");
                self.repos = repos;
                self.phase = Phase::Ready;
            }
        }
    }
}

fn error_message(e: &Error) -> String {
    let message = e.to_string();
    if message.is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}
