use std::path::Path;

use anyhow::{anyhow, bail, Result};
use rootfs_builder::config::{dump_configs, RootfsConfigSet};
use rootfs_builder::{build, preflight, storage, validate};

fn usage() -> &'static str {
    "Usage:\n  rootfs-builder validate <rootfs-configs.yaml>\n  rootfs-builder dump <rootfs-configs.yaml>\n  rootfs-builder build <rootfs-configs.yaml> <config> <data_path> <arch> [frag]\n  rootfs-builder upload <api> <token> <upload_path> <input_dir>"
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [cmd, config_path] if cmd == "validate" => validate_cmd(Path::new(config_path)),
        [cmd, config_path] if cmd == "dump" => dump_cmd(Path::new(config_path)),
        [cmd, config_path, name, data_path, arch] if cmd == "build" => {
            build_cmd(Path::new(config_path), name, Path::new(data_path), arch, None)
        }
        [cmd, config_path, name, data_path, arch, frag] if cmd == "build" => build_cmd(
            Path::new(config_path),
            name,
            Path::new(data_path),
            arch,
            Some(frag.as_str()),
        ),
        [cmd, api, token, upload_path, input_dir] if cmd == "upload" => {
            storage::upload(api, token, upload_path, Path::new(input_dir))
        }
        _ => bail!(usage()),
    }
}

fn validate_cmd(config_path: &Path) -> Result<()> {
    let configs = RootfsConfigSet::from_file(config_path)?;
    if !validate::validate(&configs) {
        bail!("rootfs configs '{}' failed validation", config_path.display());
    }
    println!("{} rootfs configs valid", configs.len());
    Ok(())
}

fn dump_cmd(config_path: &Path) -> Result<()> {
    let configs = RootfsConfigSet::from_file(config_path)?;
    dump_configs(&configs);
    Ok(())
}

fn build_cmd(
    config_path: &Path,
    name: &str,
    data_path: &Path,
    arch: &str,
    frag: Option<&str>,
) -> Result<()> {
    let configs = RootfsConfigSet::from_file(config_path)?;
    let config = configs
        .get(name)
        .ok_or_else(|| anyhow!("unknown rootfs config '{}'", name))?;
    if !config.arch_list().iter().any(|entry| entry == arch) {
        bail!("arch '{}' not in arch_list for '{}'", arch, name);
    }

    preflight::check_backend(config, data_path)?;
    if !build::build(name, config, data_path, arch, frag)? {
        bail!("rootfs build failed for '{}' ({})", name, arch);
    }
    println!("  Built rootfs '{}' for {}", name, arch);
    Ok(())
}
