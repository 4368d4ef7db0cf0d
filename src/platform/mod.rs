//! Platform detection and asset selection module
//!
//! This module resolves the host architecture to the tag used in release
//! asset names and selects which release asset to download for it.

mod arch;
mod picker;

pub use arch::Arch;
pub use picker::{AssetSelection, PackageKind, PackagePicker};
