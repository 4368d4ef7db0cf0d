//! Child process execution under a time limit.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{ProcessOutcome, RealRuntime};

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn run_with_timeout_impl(
        &self,
        program: &Path,
        args: Vec<String>,
        timeout: Duration,
    ) -> Result<ProcessOutcome> {
        // Dropping the child on timeout kills it.
        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {:?}", program))?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output =
                    output.with_context(|| format!("Failed to wait for {:?}", program))?;
                if !output.stdout.is_empty() {
                    debug!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
                }
                if !output.stderr.is_empty() {
                    debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
                }
                Ok(ProcessOutcome::Exited(output.status.code()))
            }
            Err(_) => {
                debug!(
                    "{:?} did not exit within {} seconds",
                    program,
                    timeout.as_secs()
                );
                Ok(ProcessOutcome::TimedOut)
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::runtime::{ProcessOutcome, RealRuntime, Runtime};
    use std::path::Path;
    use std::time::Duration;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_run_with_timeout_success() {
        let outcome = RealRuntime
            .run_with_timeout(Path::new("sh"), sh("echo installed"), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(outcome, ProcessOutcome::Exited(Some(0)));
    }

    #[tokio::test]
    async fn test_run_with_timeout_nonzero_exit() {
        let outcome = RealRuntime
            .run_with_timeout(Path::new("sh"), sh("exit 3"), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(outcome, ProcessOutcome::Exited(Some(3)));
    }

    #[tokio::test]
    async fn test_run_with_timeout_times_out() {
        let outcome = RealRuntime
            .run_with_timeout(Path::new("sh"), sh("sleep 5"), Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(outcome, ProcessOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_run_with_timeout_missing_program() {
        let result = RealRuntime
            .run_with_timeout(
                Path::new("/nonexistent/helium-installer.exe"),
                vec!["/S".to_string()],
                Duration::from_secs(1),
            )
            .await;
        assert!(result.is_err());
    }
}
