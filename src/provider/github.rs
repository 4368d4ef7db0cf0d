//! GitHub provider implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use crate::http::HttpClient;

use super::{Provider, Release, ReleaseAsset, RepoId};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type requested from the REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Time allowed for a metadata request, end to end.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API response types (internal).
///
/// Fields are optional so that a sparse response still deserializes.
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Default)]
    #[serde(default)]
    pub struct Release {
        pub tag_name: Option<String>,
        pub body: Option<String>,
        pub html_url: Option<String>,
        pub published_at: Option<String>,
        pub assets: Option<Vec<Asset>>,
    }

    #[derive(Deserialize, Debug, Default)]
    #[serde(default)]
    pub struct Asset {
        pub name: Option<String>,
        pub size: Option<u64>,
        pub browser_download_url: Option<String>,
    }
}

/// GitHub provider implementation.
pub struct GitHubProvider {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubProvider {
    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_latest_release(&self, repo: &RepoId) -> Result<api::Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        );
        debug!("Fetching latest release from {}...", url);
        self.http_client
            .get_json(&url, GITHUB_ACCEPT, METADATA_TIMEOUT)
            .await
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    #[tracing::instrument(skip(self))]
    async fn latest_release(&self, repo: &RepoId) -> Result<Release> {
        let release = self.fetch_latest_release(repo).await?;
        Ok(release.into())
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            tag: r.tag_name.unwrap_or_default(),
            body: r.body,
            html_url: r.html_url,
            published_at: r.published_at,
            assets: r
                .assets
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.into())
                .collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            name: a.name.unwrap_or_default(),
            download_url: a.browser_download_url,
            size: a.size,
        }
    }
}
