//! Update availability: latest release vs. installed version.

use log::{debug, info, warn};

use super::{ReleaseInfo, UpdateChecker};
use crate::platform::{Arch, PackagePicker};
use crate::provider::{Provider, Release};
use crate::runtime::Runtime;
use crate::version::is_newer;

impl<R: Runtime, P: Provider> UpdateChecker<R, P> {
    /// Query the latest release and decide whether it is an actionable
    /// update for this machine.
    ///
    /// Returns `None` when the release host could not be reached or
    /// answered with something unusable, when the latest release is not
    /// newer, and when it has no package for this architecture.
    #[tracing::instrument(skip(self), fields(repo = %self.repo))]
    pub async fn check_for_updates(&self) -> Option<ReleaseInfo> {
        let release = match self.provider.latest_release(&self.repo).await {
            Ok(release) => release,
            Err(e) => {
                warn!("Failed to fetch latest release of {}: {:#}", self.repo, e);
                return None;
            }
        };

        evaluate_release(release, &self.current_version, self.architecture())
    }
}

/// Decide whether `release` is an update over `current_version` that can be
/// installed on `arch`.
pub fn evaluate_release(release: Release, current_version: &str, arch: Arch) -> Option<ReleaseInfo> {
    let version = release.tag.strip_prefix('v').unwrap_or(&release.tag);
    if version.is_empty() {
        debug!("Latest release has no tag");
        return None;
    }

    if !is_newer(version, current_version) {
        debug!("{} is not newer than {}", version, current_version);
        return None;
    }

    let selection = PackagePicker::new(arch).pick(&release.assets);
    if selection.is_empty() {
        info!(
            "Release {} has no {} installer or archive, ignoring it",
            version, arch
        );
        return None;
    }

    Some(ReleaseInfo {
        version: version.to_string(),
        release_notes: release.body.unwrap_or_default(),
        release_url: release.html_url,
        published_at: release.published_at,
        installer: selection.installer,
        archive: selection.archive,
        architecture: arch,
    })
}
