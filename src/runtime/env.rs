//! Environment and system information operations.

use std::env;
use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    /// On Windows a 32-bit process on a 64-bit OS sees the emulated
    /// architecture in `PROCESSOR_ARCHITECTURE`; the native one is in
    /// `PROCESSOR_ARCHITEW6432`.
    #[tracing::instrument(skip(self))]
    pub(crate) fn machine_arch_impl(&self) -> String {
        #[cfg(windows)]
        {
            for key in ["PROCESSOR_ARCHITEW6432", "PROCESSOR_ARCHITECTURE"] {
                if let Ok(value) = env::var(key) {
                    if !value.is_empty() {
                        return value;
                    }
                }
            }
        }
        env::consts::ARCH.to_string()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn temp_dir_impl(&self) -> PathBuf {
        env::temp_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn config_dir_impl(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::Arch;
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_env_and_dirs() {
        let runtime = RealRuntime;

        // PATH should exist on all systems
        assert!(runtime.env_var("PATH").is_ok());
        assert!(runtime.env_var("HELIUM_UPDATER_SURELY_UNSET").is_err());

        let temp = runtime.temp_dir();
        assert!(temp.is_absolute() || cfg!(windows));

        let _ = runtime.config_dir();
    }

    #[test]
    fn test_real_runtime_machine_arch() {
        let machine = RealRuntime.machine_arch();
        assert!(!machine.is_empty());

        #[cfg(all(not(windows), target_arch = "x86_64"))]
        assert_eq!(Arch::from_machine(&machine), Arch::X64);

        #[cfg(all(not(windows), target_arch = "aarch64"))]
        assert_eq!(Arch::from_machine(&machine), Arch::Arm64);

        let _ = Arch::from_machine(&machine);
    }
}
