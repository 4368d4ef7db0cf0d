use serde::Serialize;
use std::fmt;

/// Architecture tag as it appears in release asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Resolve a machine string reported by the OS (`AMD64`, `x86_64`,
    /// `aarch64`, ...). Unknown machines resolve to `X64`.
    pub fn from_machine(machine: &str) -> Self {
        match machine.trim().to_lowercase().as_str() {
            "amd64" | "x86_64" => Arch::X64,
            "arm64" | "aarch64" => Arch::Arm64,
            other => {
                log::debug!("Unrecognized machine '{}', assuming x64", other);
                Arch::X64
            }
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }

    /// Delimited forms of the tag that mark an asset name as built for this
    /// architecture: `_x64-`, `-x64-`, `_x64_`.
    pub fn markers(&self) -> [String; 3] {
        let tag = self.tag();
        [
            format!("_{}-", tag),
            format!("-{}-", tag),
            format!("_{}_", tag),
        ]
    }

    /// True if the lower-cased asset name carries one of this
    /// architecture's markers.
    pub fn matches_asset(&self, lower_name: &str) -> bool {
        self.markers().iter().any(|m| lower_name.contains(m.as_str()))
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_machine_x64_aliases() {
        assert_eq!(Arch::from_machine("amd64"), Arch::X64);
        assert_eq!(Arch::from_machine("AMD64"), Arch::X64);
        assert_eq!(Arch::from_machine("x86_64"), Arch::X64);
    }

    #[test]
    fn test_from_machine_arm64_aliases() {
        assert_eq!(Arch::from_machine("arm64"), Arch::Arm64);
        assert_eq!(Arch::from_machine("ARM64"), Arch::Arm64);
        assert_eq!(Arch::from_machine("aarch64"), Arch::Arm64);
    }

    #[test]
    fn test_from_machine_unknown_falls_back_to_x64() {
        for machine in ["", "x86", "i686", "riscv64", "ppc64le", "armv7l", "???"] {
            assert_eq!(Arch::from_machine(machine), Arch::X64, "{}", machine);
        }
    }

    #[test]
    fn test_tag_and_display() {
        assert_eq!(Arch::X64.tag(), "x64");
        assert_eq!(Arch::Arm64.to_string(), "arm64");
    }

    #[test]
    fn test_matches_asset_markers() {
        assert!(Arch::X64.matches_asset("helium_1.2.3.4_x64-installer.exe"));
        assert!(Arch::X64.matches_asset("helium-x64-windows.zip"));
        assert!(Arch::X64.matches_asset("helium_x64_portable.zip"));
        assert!(!Arch::X64.matches_asset("helium_1.2.3.4_arm64-installer.exe"));
        assert!(!Arch::X64.matches_asset("helium-x64.exe"));
        assert!(Arch::Arm64.matches_asset("helium_1.2.3.4_arm64-windows.zip"));
    }

    #[test]
    fn test_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Arch::Arm64).unwrap(), r#""arm64""#);
    }
}
