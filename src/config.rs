//! Updater configuration document.
//!
//! The host application ships an `update_config.json` with sections for the
//! update server, preferences, UI behaviour and download settings. Only the
//! `update_server` section concerns the updater; the other sections are
//! accepted as-is.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provider::RepoId;
use crate::runtime::Runtime;

pub const CONFIG_FILE_NAME: &str = "update_config.json";
pub const CONFIG_DIR_NAME: &str = "helium";

/// Hosting type of the only release host supported.
pub const GITHUB_RELEASES: &str = "github_releases";

/// Where releases are published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateServer {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub api_url: Option<String>,
}

impl UpdateServer {
    /// The repository, if both owner and name are present.
    pub fn repo(&self) -> Option<RepoId> {
        match (&self.repo_owner, &self.repo_name) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                Some(RepoId::new(owner.as_str(), name.as_str()))
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.kind.as_deref() {
            None | Some(GITHUB_RELEASES) => Ok(()),
            Some(other) => bail!(
                "Unsupported update server type '{}'. Expected '{}'.",
                other,
                GITHUB_RELEASES
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub update_server: UpdateServer,
}

impl UpdateConfig {
    /// Default location: `<config dir>/helium/update_config.json`.
    pub fn default_path<R: Runtime>(runtime: &R) -> Option<PathBuf> {
        runtime
            .config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: UpdateConfig =
            serde_json::from_str(content).context("Failed to parse update configuration")?;
        config.update_server.validate()?;
        Ok(config)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Invalid configuration in {:?}", path))
    }

    /// Load an explicitly given file, or the default file if it exists.
    /// Falls back to an empty configuration when neither applies.
    pub fn load_or_default<R: Runtime>(runtime: &R, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(runtime, path);
        }

        match Self::default_path(runtime) {
            Some(path) if runtime.exists(&path) => Self::load(runtime, &path),
            _ => {
                debug!("No update configuration found, using defaults");
                Ok(Self::default())
            }
        }
    }
}
