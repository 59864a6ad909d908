//! Wire types for the GitHub REST API.
//!
//! Unknown fields in API responses are ignored; only the fields the
//! application renders or persists are modeled.

use serde::{Deserialize, Serialize};

/// A repository owner as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Login name of the owning user or organization.
    pub login: String,
    /// Numeric id of the owner account.
    pub id: u64,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile page URL.
    pub html_url: String,
}

/// A GitHub repository as returned by the search and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Stable numeric id. This is the identity bookmarks are keyed on.
    pub id: u64,
    /// Short repository name.
    pub name: String,
    /// Repository name in `owner/name` form.
    pub full_name: String,
    /// Repository page URL.
    pub html_url: String,
    /// Description, when the owner wrote one.
    pub description: Option<String>,
    /// Star count.
    pub stargazers_count: u32,
    /// Primary language, when detected.
    pub language: Option<String>,
    /// Owning user or organization.
    pub owner: Owner,
}

/// Response envelope of the repository search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of matches on the server side.
    #[serde(default)]
    pub total_count: u64,
    /// Whether the server truncated the search.
    #[serde(default)]
    pub incomplete_results: bool,
    /// The returned page of repositories. Absent fields deserialize as
    /// an empty page.
    #[serde(default)]
    pub items: Vec<Repo>,
}
