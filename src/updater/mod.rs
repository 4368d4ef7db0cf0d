//! Update checker - discovers, downloads and installs new releases.
//!
//! The workflow is check → download → install → cleanup. Each step is an
//! independent call with no state carried between calls; every failure is
//! logged and reported as an absent result (or `false`) rather than an
//! error.

mod check;
mod download;
mod install;

use serde::Serialize;
use std::time::Duration;

use crate::http::HttpClient;
use crate::platform::Arch;
use crate::provider::{GitHubProvider, Provider, ReleaseAsset, RepoId};
use crate::runtime::Runtime;

pub use check::evaluate_release;
pub use download::ProgressFn;
pub use install::InstallOutcome;

pub const PRODUCT_NAME: &str = "Helium-Browser";
pub const DEFAULT_REPO_OWNER: &str = "imputnet";
pub const DEFAULT_REPO_NAME: &str = "helium-windows";

/// Longest a download may go without receiving data.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest the installer may run.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Flag that puts the installer in unattended mode.
pub const SILENT_INSTALL_FLAG: &str = "/S";

/// User agent sent with every request: `Helium-Browser-Updater/<version>`.
pub fn user_agent(current_version: &str) -> String {
    format!("{}-Updater/{}", PRODUCT_NAME, current_version)
}

/// A newer release with at least one package for this machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseInfo {
    pub version: String,
    pub release_notes: String,
    pub release_url: Option<String>,
    pub published_at: Option<String>,
    pub installer: Option<ReleaseAsset>,
    pub archive: Option<ReleaseAsset>,
    pub architecture: Arch,
}

impl ReleaseInfo {
    /// The asset a download would fetch: the installer if there is one,
    /// otherwise the archive.
    pub fn preferred_asset(&self) -> Option<&ReleaseAsset> {
        self.installer.as_ref().or(self.archive.as_ref())
    }
}

pub struct UpdateChecker<R: Runtime, P: Provider = GitHubProvider> {
    runtime: R,
    provider: P,
    http_client: HttpClient,
    current_version: String,
    repo: RepoId,
    user_agent: String,
}

impl<R: Runtime> UpdateChecker<R, GitHubProvider> {
    /// Create a checker against GitHub. `api_url` defaults to the public API.
    ///
    /// `GITHUB_TOKEN`, when set, authenticates every request.
    pub fn new(
        runtime: R,
        current_version: &str,
        repo: RepoId,
        api_url: Option<&str>,
    ) -> anyhow::Result<Self> {
        let user_agent = user_agent(current_version);
        let token = runtime.env_var("GITHUB_TOKEN").ok();
        let http_client = HttpClient::with_user_agent(&user_agent, token.as_deref())?;
        let provider = GitHubProvider::from_http_client(
            http_client.clone(),
            api_url.unwrap_or(crate::provider::DEFAULT_API_URL),
        );

        Ok(Self::with_provider(
            runtime,
            provider,
            http_client,
            current_version,
            repo,
        ))
    }
}

impl<R: Runtime, P: Provider> UpdateChecker<R, P> {
    pub fn with_provider(
        runtime: R,
        provider: P,
        http_client: HttpClient,
        current_version: &str,
        repo: RepoId,
    ) -> Self {
        Self {
            runtime,
            provider,
            http_client,
            current_version: current_version.to_string(),
            repo,
            user_agent: user_agent(current_version),
        }
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn api_url(&self) -> &str {
        self.provider.api_url()
    }

    /// Architecture of this machine, as used in asset names.
    pub fn architecture(&self) -> Arch {
        Arch::from_machine(&self.runtime.machine_arch())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use crate::runtime::{MockRuntime, RealRuntime};
    use reqwest::Client;

    #[test]
    fn test_user_agent_format() {
        assert_eq!(user_agent("1.0.0.0"), "Helium-Browser-Updater/1.0.0.0");
    }

    #[test]
    fn test_new_uses_default_api_url() {
        let checker = UpdateChecker::new(
            RealRuntime,
            "1.0.0.0",
            RepoId::new(DEFAULT_REPO_OWNER, DEFAULT_REPO_NAME),
            None,
        )
        .unwrap();

        assert_eq!(checker.api_url(), "https://api.github.com");
        assert_eq!(checker.current_version(), "1.0.0.0");
        assert_eq!(checker.repo().to_string(), "imputnet/helium-windows");
        assert_eq!(checker.user_agent(), "Helium-Browser-Updater/1.0.0.0");
    }

    #[test]
    fn test_architecture_comes_from_runtime() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_machine_arch()
            .returning(|| "ARM64".to_string());

        let checker = UpdateChecker::with_provider(
            runtime,
            MockProvider::new(),
            HttpClient::new(Client::new()),
            "1.0.0.0",
            RepoId::new("owner", "repo"),
        );

        assert_eq!(checker.architecture(), Arch::Arm64);
    }

    #[test]
    fn test_preferred_asset_prefers_installer() {
        let installer = test_support::asset("helium_1.0_x64-installer.exe", "http://x");
        let archive = test_support::asset("helium_1.0_x64-windows.zip", "http://x");
        let mut info = ReleaseInfo {
            version: "1.0".into(),
            release_notes: String::new(),
            release_url: None,
            published_at: None,
            installer: Some(installer.clone()),
            archive: Some(archive.clone()),
            architecture: Arch::X64,
        };
        assert_eq!(info.preferred_asset(), Some(&installer));

        info.installer = None;
        assert_eq!(info.preferred_asset(), Some(&archive));

        info.archive = None;
        assert_eq!(info.preferred_asset(), None);
    }

    #[test]
    fn test_release_info_serializes() {
        let info = ReleaseInfo {
            version: "1.2.3.4".into(),
            release_notes: "notes".into(),
            release_url: Some("https://example.com".into()),
            published_at: None,
            installer: None,
            archive: Some(test_support::asset("helium_1.2.3.4_arm64-windows.zip", "http://x")),
            architecture: Arch::Arm64,
        };
        let json: serde_json::Value = serde_json::to_value(&info).unwrap();
        assert_eq!(json["version"], "1.2.3.4");
        assert_eq!(json["architecture"], "arm64");
        assert!(json["installer"].is_null());
        assert_eq!(json["archive"]["name"], "helium_1.2.3.4_arm64-windows.zip");
    }
}
