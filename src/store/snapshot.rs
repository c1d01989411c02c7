use std::collections::BTreeMap;
use std::fmt;

/// The two generations kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotId {
    /// State as of the update before the most recent one.
    Previous,
    /// State as of the most recent update.
    Available,
}

impl SnapshotId {
    pub fn file_name(&self) -> &'static str {
        match self {
            SnapshotId::Previous => "previous",
            SnapshotId::Available => "available",
        }
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
}

/// Package name to version, ordered by name so listings are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    packages: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Snapshot::default()
    }

    /// Inserts a record. Names are unique: the first version seen wins.
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.packages.entry(name.into()).or_insert_with(|| version.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parses the flat `name version` format.
    ///
    /// Blank lines and lines with fewer than two fields are skipped.
    pub fn parse(text: &str) -> Self {
        let mut snapshot = Snapshot::new();
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            if let (Some(name), Some(version)) = (fields.next(), fields.next()) {
                snapshot.insert(name, version);
            }
        }
        snapshot
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.packages.len() * 32);
        for (name, version) in &self.packages {
            out.push_str(name);
            out.push(' ');
            out.push_str(version);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<PackageRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = PackageRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record.name, record.version);
        }
        snapshot
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (name, version) in iter {
            snapshot.insert(name, version);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_malformed_lines() {
        let snapshot = Snapshot::parse("bash 5.2-1\n\nlonely\n  coreutils   9.1-1  \n");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("bash"), Some("5.2-1"));
        assert_eq!(snapshot.get("coreutils"), Some("9.1-1"));
        assert!(!snapshot.contains("lonely"));
    }

    #[test]
    fn first_version_wins_on_duplicate_names() {
        let snapshot = Snapshot::parse("vim 2:9.0-1\nvim 2:9.1-1\n");
        assert_eq!(snapshot.get("vim"), Some("2:9.0-1"));
    }

    #[test]
    fn render_is_sorted_by_name() {
        let snapshot: Snapshot = [("zsh", "5.9"), ("apt", "2.6.1")].into_iter().collect();
        assert_eq!(snapshot.render(), "apt 2.6.1\nzsh 5.9\n");
    }

    #[test]
    fn empty_snapshot_renders_nothing() {
        assert_eq!(Snapshot::new().render(), "");
        assert!(Snapshot::parse("").is_empty());
    }
}
