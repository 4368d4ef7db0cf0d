//! Release provider abstraction.
//!
//! This module defines the release and asset records the updater works with
//! and the trait a release host implements to serve them.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub use github::{DEFAULT_API_URL, GitHubProvider};

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId::new(parts[0], parts[1]))
        }
    }
}

/// A downloadable asset from a release.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: Option<String>,
    pub size: Option<u64>,
}

/// The latest published release as reported by the provider.
///
/// Every field the host may omit is optional; an absent tag is empty.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct Release {
    /// Version tag (e.g., "v1.2.3.4")
    pub tag: String,
    /// Release notes
    pub body: Option<String>,
    /// Release page
    pub html_url: Option<String>,
    /// Publication date (ISO 8601)
    pub published_at: Option<String>,
    pub assets: Vec<ReleaseAsset>,
}

/// A release host that can report the latest release of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the API base URL.
    fn api_url(&self) -> &str;

    /// Fetch the latest published release.
    async fn latest_release(&self, repo: &RepoId) -> Result<Release>;
}
