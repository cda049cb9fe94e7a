//! Rootfs configuration data model and loading.
//!
//! The configuration document is a YAML mapping `rootfs_configs` whose
//! entries are discriminated by `rootfs_type` into the debos and buildroot
//! variants. Entries are kept in document order on load because that order
//! is checked by the validator: generated documents stay diff-friendly and
//! merge-resistant only while the mapping is kept sorted.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Debos backend settings for one rootfs config entry.
///
/// Every field maps to a template variable in the debos manifest. Omitted
/// fields default to empty and are still passed to the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebosConfig {
    pub arch_list: Vec<String>,
    pub debian_release: String,
    pub extra_packages: Vec<String>,
    pub extra_packages_remove: Vec<String>,
    pub extra_files_remove: Vec<String>,
    pub script: String,
    pub test_overlay: String,
    pub crush_image_options: Vec<String>,
    pub debian_mirror: String,
    pub keyring_package: String,
    pub keyring_file: String,
}

/// Buildroot backend settings for one rootfs config entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildrootConfig {
    pub arch_list: Vec<String>,
    pub frags: Vec<String>,
}

/// One named rootfs configuration, tagged by `rootfs_type`.
///
/// The set of backends is closed: an unrecognized `rootfs_type` fails at
/// deserialization, and adding a backend means adding a variant here plus
/// updating the exhaustive matches in `validate` and `build`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "rootfs_type")]
pub enum RootfsConfig {
    #[serde(rename = "debos")]
    Debos(DebosConfig),
    #[serde(rename = "buildroot")]
    Buildroot(BuildrootConfig),
}

impl RootfsConfig {
    /// The `rootfs_type` tag this entry carries in the document.
    pub fn rootfs_type(&self) -> &'static str {
        match self {
            RootfsConfig::Debos(_) => "debos",
            RootfsConfig::Buildroot(_) => "buildroot",
        }
    }

    /// Architectures this entry can be built for.
    pub fn arch_list(&self) -> &[String] {
        match self {
            RootfsConfig::Debos(config) => &config.arch_list,
            RootfsConfig::Buildroot(config) => &config.arch_list,
        }
    }
}

/// The full `rootfs_configs` document, in document order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootfsConfigSet {
    #[serde(deserialize_with = "ordered_entries")]
    rootfs_configs: Vec<(String, RootfsConfig)>,
}

impl RootfsConfigSet {
    /// Load and parse a rootfs configs file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading rootfs configs '{}'", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing rootfs configs '{}'", path.display()))
    }

    /// Parse a rootfs configs document from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("parsing rootfs configs")
    }

    /// Build a set from already-typed entries, keeping the given order.
    pub fn from_entries(entries: Vec<(String, RootfsConfig)>) -> Self {
        Self {
            rootfs_configs: entries,
        }
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RootfsConfig)> {
        self.rootfs_configs
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }

    /// Config names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rootfs_configs.iter().map(|(name, _)| name.as_str())
    }

    /// Look up one entry by name.
    pub fn get(&self, name: &str) -> Option<&RootfsConfig> {
        self.rootfs_configs
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, config)| config)
    }

    pub fn len(&self) -> usize {
        self.rootfs_configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rootfs_configs.is_empty()
    }
}

/// Deserialize a YAML mapping into a vector of entries, preserving the
/// order they appear in the document.
fn ordered_entries<'de, D>(deserializer: D) -> Result<Vec<(String, RootfsConfig)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedEntries;

    impl<'de> Visitor<'de> for OrderedEntries {
        type Value = Vec<(String, RootfsConfig)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of config name to rootfs config")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedEntries)
}

/// Print every config entry and its fields to stdout.
///
/// Informational listing for operators; the format is not a machine
/// contract.
pub fn dump_configs(configs: &RootfsConfigSet) {
    for (name, config) in configs.iter() {
        println!("{}", name);
        println!("\trootfs_type: {}", config.rootfs_type());
        match config {
            RootfsConfig::Debos(debos) => dump_debos(debos),
            RootfsConfig::Buildroot(buildroot) => dump_buildroot(buildroot),
        }
    }
}

fn dump_debos(config: &DebosConfig) {
    println!("\tarch_list: {:?}", config.arch_list);
    println!("\tdebian_release: {}", config.debian_release);
    println!("\textra_packages: {:?}", config.extra_packages);
    println!("\textra_packages_remove: {:?}", config.extra_packages_remove);
    println!("\textra_files_remove: {:?}", config.extra_files_remove);
    println!("\tscript: {}", config.script);
    println!("\ttest_overlay: {}", config.test_overlay);
    println!("\tcrush_image_options: {:?}", config.crush_image_options);
    println!("\tdebian_mirror: {}", config.debian_mirror);
    println!("\tkeyring_package: {}", config.keyring_package);
    println!("\tkeyring_file: {}", config.keyring_file);
}

fn dump_buildroot(config: &BuildrootConfig) {
    println!("\tarch_list: {:?}", config.arch_list);
    println!("\tfrags: {:?}", config.frags);
}
