//! HTTP client for the GitHub REST API.

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::github::types::{Repo, SearchResponse};
use crate::github::RepoSource;

/// Number of results requested per search. The API caps and pages beyond
/// this; repomark never requests a second page.
pub const PER_PAGE: u32 = 30;

/// GitHub REST API client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    /// Build a client from API settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&api.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn search(&self, query: &str) -> Result<Vec<Repo>> {
        let url = format!("{}/search/repositories", self.base_url);
        tracing::debug!(%query, "searching repositories");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .query(&[("per_page", PER_PAGE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SearchFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: SearchResponse = response.json().await?;
        tracing::debug!(
            returned = body.items.len(),
            total = body.total_count,
            "search completed"
        );
        Ok(body.items)
    }

    async fn repo_by_id(&self, id: u64) -> Result<Repo> {
        let url = format!("{}/repositories/{id}", self.base_url);
        tracing::debug!(id, "fetching repository");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LookupFailed {
                id,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
