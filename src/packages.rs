//! Queries against the live package database.
//!
//! Thin wrappers that run dpkg-query / apt-cache through the invoker and
//! turn their output into snapshots or maps. Always run in the C locale so
//! field values and sort order do not depend on the user's LANG.

use std::collections::BTreeMap;

use crate::control::stanzas;
use crate::error::Result;
use crate::exec::{Invoke, Options};
use crate::store::{PackageRecord, Snapshot};

pub const INSTALLED_QUERY: &str = "dpkg-query --show --showformat='${Package} ${Version} ${Status}\\n'";
pub const AVAILABLE_QUERY: &str = "apt-cache dumpavail";
pub const SELECTIONS_QUERY: &str = "dpkg --get-selections";
pub const SIZES_QUERY: &str = "dpkg-query --show --showformat='${Package} ${Installed-Size} ${Status}\\n'";
pub const STATUS_QUERY: &str = "dpkg-query --show --showformat='${db:Status-Abbrev} ${Package}\\n'";

fn query() -> Options {
    Options::new().quiet().locale_c()
}

/// Packages currently installed, with their versions.
pub fn installed(shell: &dyn Invoke) -> Result<Snapshot> {
    let lines = shell.capture_checked(INSTALLED_QUERY, query())?;
    Ok(parse_installed(lines))
}

/// Rows look like `bash 5.2.15-2 install ok installed`.
pub fn parse_installed(lines: impl IntoIterator<Item = String>) -> Snapshot {
    lines
        .into_iter()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [name, version, .., "installed"] => Some(PackageRecord {
                    name: name.to_string(),
                    version: version.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Everything the configured archives offer, one version per package.
pub fn available(shell: &dyn Invoke) -> Result<Snapshot> {
    let lines = shell.capture_checked(AVAILABLE_QUERY, query())?;
    Ok(parse_available(lines))
}

pub fn parse_available(lines: impl IntoIterator<Item = String>) -> Snapshot {
    stanzas(lines)
        .filter_map(|stanza| {
            Some(PackageRecord {
                name: stanza.get("Package")?.to_string(),
                version: stanza.get("Version")?.to_string(),
            })
        })
        .collect()
}

/// Selection state (install, hold, deinstall, purge) by package name.
pub fn selections(shell: &dyn Invoke) -> Result<BTreeMap<String, String>> {
    let lines = shell.capture_checked(SELECTIONS_QUERY, query())?;
    Ok(parse_selections(lines))
}

pub fn parse_selections(lines: impl IntoIterator<Item = String>) -> BTreeMap<String, String> {
    lines
        .into_iter()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            Some((fields.next()?.to_string(), fields.next()?.to_string()))
        })
        .collect()
}

/// Names of packages on hold.
pub fn held(shell: &dyn Invoke) -> Result<Vec<String>> {
    Ok(selections(shell)?
        .into_iter()
        .filter(|(_, state)| state == "hold")
        .map(|(name, _)| name)
        .collect())
}

/// Packages removed but with configuration files left behind.
pub fn removed(shell: &dyn Invoke) -> Result<Vec<String>> {
    Ok(selections(shell)?
        .into_iter()
        .filter(|(_, state)| state == "deinstall")
        .map(|(name, _)| name)
        .collect())
}

/// Depends of every package in the archive. Only the first of a set of
/// alternatives is kept, without version or architecture qualifiers.
pub fn dependencies(shell: &dyn Invoke) -> Result<BTreeMap<String, Vec<String>>> {
    let lines = shell.capture_checked(AVAILABLE_QUERY, query())?;
    Ok(parse_dependencies(lines))
}

pub fn parse_dependencies(lines: impl IntoIterator<Item = String>) -> BTreeMap<String, Vec<String>> {
    let mut graph = BTreeMap::new();
    for stanza in stanzas(lines) {
        let Some(name) = stanza.get("Package") else {
            continue;
        };
        let depends = stanza.get("Depends").map(depends_names).unwrap_or_default();
        graph.entry(name.to_string()).or_insert(depends);
    }
    graph
}

/// `libc6 (>= 2.34), perl:any | awk` gives `libc6, perl`.
fn depends_names(field: &str) -> Vec<String> {
    field
        .split(',')
        .filter_map(|group| {
            let first = group.split('|').next()?.trim();
            let name = first.split([' ', '(', ':', '[']).next()?.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Two-letter dpkg state (`ii`, `rc`, `hi`, ...) and name of every package
/// dpkg has a record of.
pub fn status_list(shell: &dyn Invoke) -> Result<Vec<(String, String)>> {
    let lines = shell.capture_checked(STATUS_QUERY, query())?;
    Ok(parse_status_list(lines))
}

pub fn parse_status_list(lines: impl IntoIterator<Item = String>) -> Vec<(String, String)> {
    lines
        .into_iter()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let (state, name) = (fields.next()?, fields.next()?);
            // the abbreviation carries a third error column, usually blank
            let state: String = state.chars().take(2).collect();
            (state != "un").then(|| (state, name.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    pub name: String,
    pub size_kb: u64,
    /// Last word of the dpkg status, e.g. `installed` or `config-files`.
    pub status: String,
}

/// Installed-Size of every package dpkg knows about.
pub fn sizes(shell: &dyn Invoke) -> Result<Vec<SizeEntry>> {
    let lines = shell.capture_checked(SIZES_QUERY, query())?;
    Ok(parse_sizes(lines))
}

pub fn parse_sizes(lines: impl IntoIterator<Item = String>) -> Vec<SizeEntry> {
    lines
        .into_iter()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [name, size, .., status] => Some(SizeEntry {
                    name: name.to_string(),
                    size_kb: size.parse().ok()?,
                    status: status.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
