//! Package download into the temp directory and its cleanup.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use super::{DOWNLOAD_TIMEOUT, ReleaseInfo, UpdateChecker};
use crate::provider::Provider;
use crate::runtime::Runtime;

/// Progress callback: `(bytes_so_far, total_bytes)`.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(u64, u64) + Send);

impl<R: Runtime, P: Provider> UpdateChecker<R, P> {
    /// Download the preferred package of `info` into the temp directory.
    ///
    /// `progress` is only called when the server declares the content
    /// length. On failure any partially written file is removed and `None`
    /// is returned.
    #[tracing::instrument(skip(self, info, progress), fields(version = %info.version))]
    pub async fn download_update(
        &self,
        info: &ReleaseInfo,
        progress: Option<ProgressFn<'_>>,
    ) -> Option<PathBuf> {
        let Some(asset) = info.preferred_asset() else {
            warn!("Release {} has no package to download", info.version);
            return None;
        };

        let Some(url) = asset.download_url.as_deref() else {
            warn!("Asset {} has no download URL", asset.name);
            return None;
        };

        let Some(file_name) = Path::new(&asset.name).file_name() else {
            warn!("Asset name {:?} is not a file name", asset.name);
            return None;
        };
        let local_path = self.runtime.temp_dir().join(file_name);

        info!("Downloading {} to {:?}...", asset.name, local_path);

        let mut progress = progress;
        let result = self
            .http_client
            .download_file(
                url,
                DOWNLOAD_TIMEOUT,
                || self.runtime.create_file(&local_path),
                |done, total| {
                    if let (Some(callback), Some(total)) =
                        (progress.as_deref_mut(), total.filter(|t| *t > 0))
                    {
                        callback(done, total);
                    }
                },
            )
            .await;

        match result {
            Ok(bytes) => {
                info!("Download complete ({} bytes).", bytes);
                Some(local_path)
            }
            Err(e) => {
                warn!("Error downloading update: {:#}", e);
                if self.runtime.exists(&local_path) {
                    if let Err(e) = self.runtime.remove_file(&local_path) {
                        debug!("Could not remove partial download: {:#}", e);
                    }
                }
                None
            }
        }
    }

    /// Remove a downloaded package. Never fails.
    #[tracing::instrument(skip(self))]
    pub fn cleanup_download(&self, path: &Path) {
        match self.runtime.remove_file(path) {
            Ok(()) => debug!("Removed {:?}", path),
            Err(e) => debug!("Cleanup of {:?} skipped: {:#}", path, e),
        }
    }
}
