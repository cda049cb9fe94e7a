//! Structural validation of the rootfs configuration document.
//!
//! Every mapping and list in the document must be in strict ascending
//! order. The checks report the first adjacent pair that breaks the order
//! so the offending line can be found in a large generated file.

use crate::config::{BuildrootConfig, DebosConfig, RootfsConfig, RootfsConfigSet};

/// Scan adjacent pairs for a strict-ascending-order violation.
///
/// Returns the first pair where the later element sorts less than or equal
/// to the earlier one (duplicates count as violations), or `None` when the
/// sequence is strictly ascending.
pub fn sort_check<'a, T, I>(items: I) -> Option<(&'a T, &'a T)>
where
    T: Ord + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let mut items = items.into_iter();
    let mut prev = items.next()?;
    for item in items {
        if item <= prev {
            return Some((prev, item));
        }
        prev = item;
    }
    None
}

/// Check the whole configuration set.
///
/// Checks the top-level name order first, then every entry's list fields.
/// Prints a diagnostic naming the config and the offending pair for the
/// first violation found, and returns `false`. Returns `true` when every
/// entry passes.
pub fn validate(configs: &RootfsConfigSet) -> bool {
    if let Some((prev, next)) = sort_check(configs.names()) {
        println!("Rootfs broken order: '{}' before '{}'", prev, next);
        return false;
    }
    for (name, config) in configs.iter() {
        let ok = match config {
            RootfsConfig::Debos(debos) => validate_debos(name, debos),
            RootfsConfig::Buildroot(buildroot) => validate_buildroot(name, buildroot),
        };
        if !ok {
            return false;
        }
    }
    true
}

fn validate_debos(name: &str, config: &DebosConfig) -> bool {
    if let Some((prev, next)) = sort_check(&config.arch_list) {
        println!("Arch order broken for {}: '{}' before '{}'", name, prev, next);
        return false;
    }
    if let Some((prev, next)) = sort_check(&config.extra_packages) {
        println!(
            "Packages order broken for {}: '{}' before '{}'",
            name, prev, next
        );
        return false;
    }
    if let Some((prev, next)) = sort_check(&config.extra_packages_remove) {
        println!(
            "Packages order broken for {}: '{}' before '{}'",
            name, prev, next
        );
        return false;
    }
    true
}

fn validate_buildroot(name: &str, config: &BuildrootConfig) -> bool {
    if let Some((prev, next)) = sort_check(&config.arch_list) {
        println!("Arch order broken for {}: '{}' before '{}'", name, prev, next);
        return false;
    }
    if let Some((prev, next)) = sort_check(&config.frags) {
        println!("Frags order broken for {}: '{}' before '{}'", name, prev, next);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn debos(extra_packages: &[&str]) -> RootfsConfig {
        RootfsConfig::Debos(DebosConfig {
            arch_list: strings(&["amd64", "arm64"]),
            extra_packages: strings(extra_packages),
            ..Default::default()
        })
    }

    fn buildroot(frags: &[&str]) -> RootfsConfig {
        RootfsConfig::Buildroot(BuildrootConfig {
            arch_list: strings(&["arm64", "x86_64"]),
            frags: strings(frags),
        })
    }

    fn set(entries: Vec<(&str, RootfsConfig)>) -> RootfsConfigSet {
        RootfsConfigSet::from_entries(
            entries
                .into_iter()
                .map(|(name, config)| (name.to_string(), config))
                .collect(),
        )
    }

    #[test]
    fn sort_check_accepts_ascending() {
        let items = strings(&["bash", "curl", "zsh"]);
        assert_eq!(sort_check(&items), None);
    }

    #[test]
    fn sort_check_accepts_empty_and_singleton() {
        assert_eq!(sort_check(&Vec::<String>::new()), None);
        assert_eq!(sort_check(&strings(&["bash"])), None);
    }

    #[test]
    fn sort_check_reports_first_inversion() {
        let items = strings(&["bash", "zsh", "curl", "awk"]);
        let (prev, next) = sort_check(&items).unwrap();
        assert_eq!((prev.as_str(), next.as_str()), ("zsh", "curl"));
    }

    #[test]
    fn sort_check_rejects_duplicates() {
        let items = strings(&["bash", "bash"]);
        let (prev, next) = sort_check(&items).unwrap();
        assert_eq!((prev.as_str(), next.as_str()), ("bash", "bash"));
    }

    #[test]
    fn rejects_unsorted_config_names() {
        let configs = set(vec![("b", debos(&[])), ("a", debos(&[]))]);
        let (prev, next) = sort_check(configs.names()).unwrap();
        assert_eq!((prev, next), ("b", "a"));
        assert!(!validate(&configs));
    }

    #[test]
    fn accepts_sorted_config_names() {
        let configs = set(vec![("a", debos(&[])), ("b", buildroot(&["baseline"]))]);
        assert!(validate(&configs));
    }

    #[test]
    fn rejects_unsorted_extra_packages() {
        let configs = set(vec![("bullseye", debos(&["zsh", "bash"]))]);
        assert!(!validate(&configs));
    }

    #[test]
    fn accepts_sorted_extra_packages() {
        let configs = set(vec![("bullseye", debos(&["bash", "zsh"]))]);
        assert!(validate(&configs));
    }

    #[test]
    fn rejects_unsorted_extra_packages_remove() {
        let configs = set(vec![(
            "bullseye",
            RootfsConfig::Debos(DebosConfig {
                extra_packages_remove: strings(&["zstd", "e2fsprogs"]),
                ..Default::default()
            }),
        )]);
        assert!(!validate(&configs));
    }

    #[test]
    fn rejects_unsorted_arch_list() {
        let configs = set(vec![(
            "bullseye",
            RootfsConfig::Debos(DebosConfig {
                arch_list: strings(&["arm64", "amd64"]),
                ..Default::default()
            }),
        )]);
        assert!(!validate(&configs));
    }

    #[test]
    fn rejects_unsorted_frags() {
        let configs = set(vec![("buildroot", buildroot(&["kselftest", "baseline"]))]);
        assert!(!validate(&configs));
    }

    #[test]
    fn checks_every_entry_not_just_the_first() {
        let configs = set(vec![
            ("a", debos(&["bash", "zsh"])),
            ("b", debos(&["zsh", "bash"])),
        ]);
        assert!(!validate(&configs));
    }
}
