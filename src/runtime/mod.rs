//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the system
//! operations the updater performs, enabling dependency injection and
//! testability.
//!
//! # Structure
//!
//! - `env` - Environment variables, machine architecture and directories
//! - `fs` - File system operations (read, create, remove)
//! - `process` - Running a child process under a time limit

mod env;
mod fs;
mod process;

use anyhow::Result;
use async_trait::async_trait;
use std::env as std_env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a child process run under a time limit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process exited. `None` if it was terminated by a signal.
    Exited(Option<i32>),
    /// The time limit elapsed; the process was killed.
    TimedOut,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Machine architecture as reported by the OS (e.g. `AMD64`, `x86_64`).
    fn machine_arch(&self) -> String;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    // Directories
    fn temp_dir(&self) -> PathBuf;
    fn config_dir(&self) -> Option<PathBuf>;

    // Processes
    /// Run `program` with `args` and wait at most `timeout` for it to exit.
    async fn run_with_timeout(
        &self,
        program: &Path,
        args: Vec<String>,
        timeout: Duration,
    ) -> Result<ProcessOutcome>;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn machine_arch(&self) -> String {
        self.machine_arch_impl()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir_impl()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir_impl()
    }

    async fn run_with_timeout(
        &self,
        program: &Path,
        args: Vec<String>,
        timeout: Duration,
    ) -> Result<ProcessOutcome> {
        self.run_with_timeout_impl(program, args, timeout).await
    }
}
