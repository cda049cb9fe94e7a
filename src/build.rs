//! Build dispatch to the debos and buildroot backends.
//!
//! Each backend invocation is assembled as an explicit argument list and
//! run from the backend tool directory, so configuration-supplied strings
//! never pass through a shell. The debos template variable names and their
//! order are a contract with the `rootfs.yaml` manifest and must be kept
//! exactly as they are.

use std::path::Path;
use std::process::Command;

use anyhow::Result;

use crate::config::{DebosConfig, RootfsConfig};
use crate::process;

/// Manifest the debos invocation is run against.
pub const DEBOS_MANIFEST: &str = "rootfs.yaml";

/// Entry script for fragment-based buildroot builds, relative to the
/// buildroot tree.
pub const BUILDROOT_BUILD_SCRIPT: &str = "./configs/frags/build";

/// Fragment selected when the caller does not name one.
pub const DEFAULT_FRAGMENT: &str = "baseline";

/// Run one rootfs build.
///
/// Dispatches on the config variant, assembles the backend invocation and
/// blocks until the backend exits. Returns `Ok(true)` on a successful
/// exit, `Ok(false)` when the backend fails, and an error only when the
/// process cannot be started. `frag` selects the buildroot fragment and is
/// ignored by debos builds.
pub fn build(
    name: &str,
    config: &RootfsConfig,
    data_path: &Path,
    arch: &str,
    frag: Option<&str>,
) -> Result<bool> {
    process::run(dispatch_command(name, config, data_path, arch, frag), true)
}

fn dispatch_command(
    name: &str,
    config: &RootfsConfig,
    data_path: &Path,
    arch: &str,
    frag: Option<&str>,
) -> Command {
    match config {
        RootfsConfig::Debos(debos) => debos_command(name, debos, data_path, arch),
        RootfsConfig::Buildroot(_) => {
            buildroot_command(data_path, arch, frag.unwrap_or(DEFAULT_FRAGMENT))
        }
    }
}

/// Template variables passed to debos, in manifest contract order.
///
/// List fields are flattened to space-joined strings; an empty list still
/// produces its variable with an empty value.
fn debos_template_vars(name: &str, config: &DebosConfig, arch: &str) -> Vec<String> {
    vec![
        format!("architecture:{}", arch),
        format!("suite:{}", config.debian_release),
        format!("basename:{}/{}", name, arch),
        format!("extra_packages:{}", config.extra_packages.join(" ")),
        format!(
            "extra_packages_remove:{}",
            config.extra_packages_remove.join(" ")
        ),
        format!("extra_files_remove:{}", config.extra_files_remove.join(" ")),
        format!("script:{}", config.script),
        format!("test_overlay:{}", config.test_overlay),
        format!(
            "crush_image_options:{}",
            config.crush_image_options.join(" ")
        ),
        format!("debian_mirror:{}", config.debian_mirror),
        format!("keyring_package:{}", config.keyring_package),
        format!("keyring_file:{}", config.keyring_file),
    ]
}

fn debos_command(name: &str, config: &DebosConfig, data_path: &Path, arch: &str) -> Command {
    let mut cmd = Command::new("debos");
    cmd.current_dir(data_path);
    for var in debos_template_vars(name, config, arch) {
        cmd.arg("-t").arg(var);
    }
    cmd.arg(DEBOS_MANIFEST);
    cmd
}

fn buildroot_command(data_path: &Path, arch: &str, frag: &str) -> Command {
    let mut cmd = Command::new(BUILDROOT_BUILD_SCRIPT);
    cmd.current_dir(data_path).arg(arch).arg(frag);
    cmd
}
