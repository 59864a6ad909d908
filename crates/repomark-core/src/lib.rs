//! # repomark-core
//!
//! Core library for searching GitHub repositories and bookmarking them
//! locally.
//!
//! This crate provides the headless building blocks: a debounced query
//! pipeline, an HTTP search client, a persisted bookmark set and the
//! controller that keeps the visible result list consistent with both.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`github`] - GitHub REST API types and client
//! - [`debounce`] - debounced value propagation for query input
//! - [`storage`] - durable key-value persistence
//! - [`bookmarks`] - the persisted bookmark set
//! - [`controller`] - the result controller and its state machine
//! - [`config`] - configuration types and loading
//! - [`error`] - error types for the library
//!
//! ## Example
//!
//! ```rust,ignore
//! use repomark_core::{Config, session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), repomark_core::Error> {
//!     let config = Config::load()?;
//!     let mut controller = session(&config)?;
//!     controller.set_query("rust http client");
//!     loop {
//!         controller.pump().await;
//!         // render controller.visible()
//!     }
//! }
//! ```

pub mod bookmarks;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod github;
pub mod storage;

use std::sync::Arc;

pub use bookmarks::BookmarkStore;
pub use config::Config;
pub use controller::{Phase, SearchController};
pub use error::Error;
pub use github::{GithubClient, Repo, RepoSource};
use storage::{FileStorage, Storage};

/// Assemble a ready-to-drive controller from configuration.
///
/// Builds the file-backed storage, loads the persisted bookmark set and
/// constructs the HTTP client. Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn session(config: &Config) -> Result<SearchController, Error> {
    let data_dir = config.storage.resolve_data_dir();
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(data_dir));
    let bookmarks = BookmarkStore::load(storage);
    let client = GithubClient::new(&config.api)?;

    Ok(SearchController::new(
        Arc::new(client),
        bookmarks,
        config.search.debounce(),
    ))
}
