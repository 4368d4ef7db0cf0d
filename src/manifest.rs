//! Build-time version manifest.
//!
//! The browser build writes a `version_manifest.json` describing the
//! version it produced and where its updates are published.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::UpdateServer;
use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionManifest {
    pub version: String,
    /// Seconds since the Unix epoch.
    pub build_time: i64,
    #[serde(default)]
    pub chromium_version: Option<String>,
    /// Version components by name (`HELIUM_MAJOR`, `HELIUM_MINOR`, ...).
    #[serde(default)]
    pub helium_version_parts: BTreeMap<String, String>,
    #[serde(default)]
    pub update_server: UpdateServer,
}

impl VersionManifest {
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: VersionManifest =
            serde_json::from_str(content).context("Failed to parse version manifest")?;
        manifest.update_server.validate()?;
        Ok(manifest)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Invalid version manifest {:?}", path))
    }
}
