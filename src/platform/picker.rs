//! Release asset classification and per-architecture selection.

use log::debug;
use std::path::Path;

use super::Arch;
use crate::provider::ReleaseAsset;

/// Kind of package a release asset or downloaded file represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Self-contained setup executable that supports unattended mode.
    Installer,
    /// Portable archive that needs manual extraction.
    Archive,
}

impl PackageKind {
    /// Classify a lower-cased release asset name by its suffix.
    pub fn from_asset_name(lower_name: &str) -> Option<Self> {
        if lower_name.ends_with("-installer.exe") {
            Some(PackageKind::Installer)
        } else if lower_name.ends_with("-windows.zip") {
            Some(PackageKind::Archive)
        } else {
            None
        }
    }

    /// Classify a downloaded file by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("exe") {
            Some(PackageKind::Installer)
        } else if ext.eq_ignore_ascii_case("zip") {
            Some(PackageKind::Archive)
        } else {
            None
        }
    }
}

/// Assets chosen from a release for one architecture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSelection {
    pub installer: Option<ReleaseAsset>,
    pub archive: Option<ReleaseAsset>,
}

impl AssetSelection {
    pub fn is_empty(&self) -> bool {
        self.installer.is_none() && self.archive.is_none()
    }
}

/// Picks the installer and archive assets built for an architecture.
pub struct PackagePicker {
    arch: Arch,
}

impl PackagePicker {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }

    /// Scan assets in order. The first match for each package kind wins.
    pub fn pick(&self, assets: &[ReleaseAsset]) -> AssetSelection {
        let mut selection = AssetSelection::default();

        for asset in assets {
            let name = asset.name.to_lowercase();
            if !self.arch.matches_asset(&name) {
                continue;
            }

            let slot = match PackageKind::from_asset_name(&name) {
                Some(PackageKind::Installer) => &mut selection.installer,
                Some(PackageKind::Archive) => &mut selection.archive,
                None => continue,
            };

            if slot.is_some() {
                debug!("Ignoring duplicate {} asset {}", self.arch, asset.name);
                continue;
            }
            *slot = Some(asset.clone());
        }

        selection
    }
}
