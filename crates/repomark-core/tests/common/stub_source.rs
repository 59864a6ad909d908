use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use repomark_core::error::{Error, Result};
use repomark_core::github::{Repo, RepoSource};

enum SearchScript {
    Results(Vec<Repo>),
    Fail { status: u16, status_text: String },
}

/// A scripted repository source for driving the controller in tests.
///
/// Search results are registered per query and lookups per id; an
/// unregistered query returns an empty list and an unregistered id a
/// 404-shaped error. Optional artificial latency makes in-flight states
/// observable under paused time, and every call is recorded so tests can
/// assert on dispatch counts and concurrency.
#[allow(dead_code)]
pub struct StubSource {
    searches: Mutex<HashMap<String, SearchScript>>,
    search_latency: Mutex<HashMap<String, Duration>>,
    repos_by_id: Mutex<HashMap<u64, Repo>>,
    lookup_latency: Mutex<HashMap<u64, Duration>>,
    search_log: Mutex<Vec<String>>,
    lookup_calls: AtomicUsize,
    lookups_in_flight: AtomicUsize,
    max_lookups_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl StubSource {
    /// Creates a stub with nothing scripted.
    pub fn new() -> Self {
        Self {
            searches: Mutex::new(HashMap::new()),
            search_latency: Mutex::new(HashMap::new()),
            repos_by_id: Mutex::new(HashMap::new()),
            lookup_latency: Mutex::new(HashMap::new()),
            search_log: Mutex::new(Vec::new()),
            lookup_calls: AtomicUsize::new(0),
            lookups_in_flight: AtomicUsize::new(0),
            max_lookups_in_flight: AtomicUsize::new(0),
        }
    }

    /// Registers the result list returned for `query`.
    pub fn on_search(&self, query: &str, repos: Vec<Repo>) {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), SearchScript::Results(repos));
    }

    /// Registers a failure for `query`.
    pub fn fail_search(&self, query: &str, status: u16, status_text: &str) {
        self.searches.lock().unwrap().insert(
            query.to_string(),
            SearchScript::Fail {
                status,
                status_text: status_text.to_string(),
            },
        );
    }

    /// Delays the response for `query` by `latency` of virtual time.
    pub fn set_search_latency(&self, query: &str, latency: Duration) {
        self.search_latency
            .lock()
            .unwrap()
            .insert(query.to_string(), latency);
    }

    /// Registers a repository resolvable by id.
    pub fn on_repo(&self, repo: Repo) {
        self.repos_by_id.lock().unwrap().insert(repo.id, repo);
    }

    /// Delays the lookup of `id` by `latency` of virtual time.
    pub fn set_lookup_latency(&self, id: u64, latency: Duration) {
        self.lookup_latency.lock().unwrap().insert(id, latency);
    }

    /// Number of search calls dispatched so far.
    pub fn search_calls(&self) -> usize {
        self.search_log.lock().unwrap().len()
    }

    /// Every query string that reached the source, in dispatch order.
    pub fn searched_queries(&self) -> Vec<String> {
        self.search_log.lock().unwrap().clone()
    }

    /// Number of per-id lookups dispatched so far.
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Highest number of lookups that were in flight at the same time.
    pub fn max_concurrent_lookups(&self) -> usize {
        self.max_lookups_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for StubSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepoSource for StubSource {
    async fn search(&self, query: &str) -> Result<Vec<Repo>> {
        self.search_log.lock().unwrap().push(query.to_string());

        let latency = self.search_latency.lock().unwrap().get(query).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self.searches.lock().unwrap();
        match scripted.get(query) {
            Some(SearchScript::Results(repos)) => Ok(repos.clone()),
            Some(SearchScript::Fail {
                status,
                status_text,
            }) => Err(Error::SearchFailed {
                status: *status,
                status_text: status_text.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn repo_by_id(&self, id: u64) -> Result<Repo> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.lookups_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_lookups_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        let latency = self.lookup_latency.lock().unwrap().get(&id).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.lookups_in_flight.fetch_sub(1, Ordering::SeqCst);

        let repo = self.repos_by_id.lock().unwrap().get(&id).cloned();
        repo.ok_or(Error::LookupFailed { id, status: 404 })
    }
}
