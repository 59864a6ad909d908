//! GitHub REST API types and client.
//!
//! The [`RepoSource`] trait is the seam between the result controller and
//! the network. [`GithubClient`] is the production implementation; test
//! code substitutes scripted sources.

mod client;
mod types;

use async_trait::async_trait;

pub use client::{GithubClient, PER_PAGE};
pub use types::{Owner, Repo, SearchResponse};

use crate::error::Result;

/// Source of repository data.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Search repositories matching `query`.
    ///
    /// The query string is sent verbatim; callers decide what counts as
    /// empty before dispatching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchFailed`](crate::Error::SearchFailed) when the
    /// API reports a non-success status, or a transport error when the
    /// request itself fails.
    async fn search(&self, query: &str) -> Result<Vec<Repo>>;

    /// Fetch a single repository by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LookupFailed`](crate::Error::LookupFailed) when the
    /// API reports a non-success status, or a transport error when the
    /// request itself fails.
    async fn repo_by_id(&self, id: u64) -> Result<Repo>;
}
