//! Snapshot comparison.
//!
//! Versions are opaque strings here: two versions either match or they
//! don't. Ordering questions belong to dpkg.

use std::collections::BTreeSet;

use super::Snapshot;

/// One row of an upgrade listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRow {
    pub name: String,
    /// Empty when the listing does not involve the previous generation.
    pub previous_version: String,
    pub available_version: String,
    pub installed_version: String,
}

/// Names in `available` that `previous` does not have.
///
/// An empty `previous` (first run) makes every available name new.
pub fn diff_new(previous: &Snapshot, available: &Snapshot) -> BTreeSet<String> {
    available
        .names()
        .filter(|name| !previous.contains(name))
        .map(str::to_string)
        .collect()
}

/// Installed packages whose available version changed since the previous
/// update and is not what is installed.
pub fn diff_upgraded(previous: &Snapshot, available: &Snapshot, installed: &Snapshot) -> Vec<UpgradeRow> {
    available
        .iter()
        .filter_map(|(name, available_version)| {
            let previous_version = previous.get(name)?;
            let installed_version = installed.get(name)?;
            if previous_version == available_version || installed_version == available_version {
                return None;
            }
            Some(UpgradeRow {
                name: name.to_string(),
                previous_version: previous_version.to_string(),
                available_version: available_version.to_string(),
                installed_version: installed_version.to_string(),
            })
        })
        .collect()
}

/// Installed packages whose available version differs from the installed one.
pub fn to_upgrade(available: &Snapshot, installed: &Snapshot) -> Vec<UpgradeRow> {
    installed
        .iter()
        .filter_map(|(name, installed_version)| {
            let available_version = available.get(name)?;
            (available_version != installed_version).then(|| UpgradeRow {
                name: name.to_string(),
                previous_version: String::new(),
                available_version: available_version.to_string(),
                installed_version: installed_version.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, &str)]) -> Snapshot {
        pairs.iter().copied().collect()
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn self_diff_has_nothing_new() {
        let s = snap(&[("a", "1"), ("b", "2"), ("c", "3")]);
        assert!(diff_new(&s, &s).is_empty());
        assert!(diff_upgraded(&s, &s, &s).is_empty());
    }

    #[test]
    fn disjoint_snapshots_make_everything_new() {
        let a = snap(&[("a", "1"), ("b", "1")]);
        let b = snap(&[("x", "1"), ("y", "2"), ("z", "3")]);
        assert_eq!(names(&diff_new(&a, &b)), vec!["x", "y", "z"]);
    }

    #[test]
    fn first_run_treats_all_available_as_new() {
        let previous = Snapshot::new();
        let available = snap(&[("x", "1")]);
        assert_eq!(names(&diff_new(&previous, &available)), vec!["x"]);
    }

    #[test]
    fn mixed_update_scenario() {
        let previous = snap(&[("a", "1"), ("b", "2")]);
        let available = snap(&[("a", "1"), ("b", "3"), ("c", "1")]);
        let installed = snap(&[("b", "2")]);

        assert_eq!(names(&diff_new(&previous, &available)), vec!["c"]);

        let upgraded = diff_upgraded(&previous, &available, &installed);
        assert_eq!(
            upgraded,
            vec![UpgradeRow {
                name: "b".to_string(),
                previous_version: "2".to_string(),
                available_version: "3".to_string(),
                installed_version: "2".to_string(),
            }]
        );
    }

    #[test]
    fn upgrades_ignore_packages_not_installed() {
        let previous = snap(&[("b", "2")]);
        let available = snap(&[("b", "3")]);
        assert!(diff_upgraded(&previous, &available, &Snapshot::new()).is_empty());
    }

    #[test]
    fn upgrades_skip_already_installed_version() {
        // user installed 3 from elsewhere before the update caught up
        let previous = snap(&[("b", "2")]);
        let available = snap(&[("b", "3")]);
        let installed = snap(&[("b", "3")]);
        assert!(diff_upgraded(&previous, &available, &installed).is_empty());
    }

    #[test]
    fn new_packages_are_not_upgrades() {
        let previous = Snapshot::new();
        let available = snap(&[("b", "3")]);
        let installed = snap(&[("b", "2")]);
        assert!(diff_upgraded(&previous, &available, &installed).is_empty());
    }

    #[test]
    fn to_upgrade_compares_installed_with_available() {
        let available = snap(&[("a", "1"), ("b", "3"), ("c", "5")]);
        let installed = snap(&[("a", "1"), ("b", "2"), ("d", "1")]);

        let rows = to_upgrade(&available, &installed);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "b");
        assert_eq!(rows[0].available_version, "3");
        assert_eq!(rows[0].installed_version, "2");
        assert!(rows[0].previous_version.is_empty());
    }
}
