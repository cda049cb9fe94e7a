//! Host checks before dispatching a build.
//!
//! Validates that the selected backend's tooling is present before any
//! subprocess is launched. This prevents cryptic errors partway into a
//! long-running build.

use std::path::Path;

use anyhow::{bail, Result};

use crate::build::{BUILDROOT_BUILD_SCRIPT, DEBOS_MANIFEST};
use crate::config::RootfsConfig;

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that the backend for `config` can run from `data_path`.
///
/// Debos builds need the `debos` tool on PATH and the manifest in the tool
/// directory; buildroot builds need the fragment build script in the tree.
pub fn check_backend(config: &RootfsConfig, data_path: &Path) -> Result<()> {
    match config {
        RootfsConfig::Debos(_) => {
            if !command_exists("debos") {
                bail!("debos not found in PATH (install: debos)");
            }
            let manifest = data_path.join(DEBOS_MANIFEST);
            if !manifest.is_file() {
                bail!("missing debos manifest '{}'", manifest.display());
            }
        }
        RootfsConfig::Buildroot(_) => {
            let script = data_path.join(BUILDROOT_BUILD_SCRIPT.trim_start_matches("./"));
            if !script.is_file() {
                bail!("missing buildroot build script '{}'", script.display());
            }
        }
    }
    Ok(())
}
