//! Unattended installation of a downloaded package.

use log::{info, warn};
use std::fmt;
use std::path::Path;

use super::{INSTALL_TIMEOUT, SILENT_INSTALL_FLAG, UpdateChecker};
use crate::platform::PackageKind;
use crate::provider::Provider;
use crate::runtime::{ProcessOutcome, Runtime};

/// How an installation attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Succeeded,
    /// The installer exited with a non-zero status (`None`: killed by a signal).
    Failed { code: Option<i32> },
    TimedOut,
    /// The installer could not be started.
    LaunchFailed,
    /// Archives are not installed automatically.
    ManualInstallRequired,
    /// Not a package type this updater knows how to install.
    Unsupported,
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Succeeded)
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::Succeeded => write!(f, "installation succeeded"),
            InstallOutcome::Failed { code: Some(code) } => {
                write!(f, "installer exited with status {}", code)
            }
            InstallOutcome::Failed { code: None } => write!(f, "installer was terminated"),
            InstallOutcome::TimedOut => write!(
                f,
                "installer did not finish within {} seconds",
                INSTALL_TIMEOUT.as_secs()
            ),
            InstallOutcome::LaunchFailed => write!(f, "installer could not be started"),
            InstallOutcome::ManualInstallRequired => {
                write!(f, "archive packages must be extracted manually")
            }
            InstallOutcome::Unsupported => write!(f, "unsupported package type"),
        }
    }
}

impl<R: Runtime, P: Provider> UpdateChecker<R, P> {
    /// Install a downloaded package and report how it went.
    #[tracing::instrument(skip(self))]
    pub async fn install(&self, path: &Path) -> InstallOutcome {
        let outcome = match PackageKind::from_path(path) {
            Some(PackageKind::Installer) => self.run_installer(path).await,
            Some(PackageKind::Archive) => InstallOutcome::ManualInstallRequired,
            None => InstallOutcome::Unsupported,
        };

        if outcome.is_success() {
            info!("Installed {:?}", path);
        } else {
            warn!("Did not install {:?}: {}", path, outcome);
        }
        outcome
    }

    /// Install a downloaded package. True only if the installer ran and
    /// exited with status zero.
    pub async fn install_update(&self, path: &Path) -> bool {
        self.install(path).await.is_success()
    }

    async fn run_installer(&self, path: &Path) -> InstallOutcome {
        info!("Running {:?} {}...", path, SILENT_INSTALL_FLAG);

        let result = self
            .runtime
            .run_with_timeout(path, vec![SILENT_INSTALL_FLAG.to_string()], INSTALL_TIMEOUT)
            .await;

        match result {
            Ok(ProcessOutcome::Exited(Some(0))) => InstallOutcome::Succeeded,
            Ok(ProcessOutcome::Exited(code)) => InstallOutcome::Failed { code },
            Ok(ProcessOutcome::TimedOut) => InstallOutcome::TimedOut,
            Err(e) => {
                warn!("Error installing update: {:#}", e);
                InstallOutcome::LaunchFailed
            }
        }
    }
}
