//! Commands built on the previous/available snapshot pair.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use super::{apt_get, query, Context};
use crate::error::Result;
use crate::exec::Options;
use crate::packages;
use crate::report;
use crate::store::diff::{self, UpgradeRow};
use crate::store::{Snapshot, SnapshotId};

const NOT_AVAILABLE: &str = "N/A";

/// Rotates available into previous and records a fresh available snapshot.
/// The archive is queried first, so a failed query leaves both files as
/// they were.
fn refresh(ctx: &Context) -> Result<(Snapshot, Snapshot)> {
    let available = packages::available(ctx.shell)?;
    let rotated = ctx.store.rotate()?;
    if !rotated {
        debug!("no available snapshot yet, nothing to rotate");
    }
    ctx.store.save(SnapshotId::Available, &available)?;
    let previous = ctx.store.load_or_empty(SnapshotId::Previous)?;
    Ok((previous, available))
}

fn upgrade_message(count: usize) -> String {
    match count {
        0 => "There are no new upgrades".to_string(),
        1 => "There is 1 new upgrade".to_string(),
        n => format!("There are {n} new upgrades"),
    }
}

fn warn_if_stale(ctx: &Context) -> Result<()> {
    let (Some(limit), Some(updated)) = (ctx.config.stale_after, ctx.store.last_update()?) else {
        return Ok(());
    };
    let age = SystemTime::now().duration_since(updated).unwrap_or_default();
    if age > limit {
        eprintln!(
            "warning: package lists were last recorded {} ago, run 'jig update' first",
            humantime::format_duration(Duration::from_secs(age.as_secs()))
        );
    }
    Ok(())
}

pub(super) fn update(ctx: &Context, _args: &[String]) -> Result<()> {
    ctx.shell.run_checked("apt-get update", Options::root())?;

    if ctx.config.simulate {
        debug!("simulating, snapshots left untouched");
        return Ok(());
    }

    let (previous, available) = refresh(ctx)?;
    let installed = packages::installed(ctx.shell)?;
    let upgrades = diff::diff_upgraded(&previous, &available, &installed);
    info!(
        available = available.len(),
        new = diff::diff_new(&previous, &available).len(),
        upgrades = upgrades.len(),
        "snapshots refreshed"
    );
    println!("{}", upgrade_message(upgrades.len()));
    Ok(())
}

fn new_rows(previous: &Snapshot, available: &Snapshot) -> Vec<Vec<String>> {
    diff::diff_new(previous, available)
        .into_iter()
        .map(|name| {
            let version = available.get(&name).unwrap_or_default().to_string();
            vec![name, version]
        })
        .collect()
}

fn load_pair(ctx: &Context) -> Result<(Snapshot, Snapshot)> {
    Ok((
        ctx.store.load_or_empty(SnapshotId::Previous)?,
        ctx.store.load_or_empty(SnapshotId::Available)?,
    ))
}

pub(super) fn new(ctx: &Context, _args: &[String]) -> Result<()> {
    warn_if_stale(ctx)?;
    let (previous, available) = load_pair(ctx)?;
    report::print_table(
        ctx.config,
        &["Package", "Available"],
        &new_rows(&previous, &available),
        &[24, 16],
    );
    Ok(())
}

fn upgrade_rows(rows: Vec<UpgradeRow>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|r| vec![r.name, r.available_version, r.installed_version])
        .collect()
}

fn print_upgrades(ctx: &Context, rows: Vec<UpgradeRow>, empty: &str) {
    if rows.is_empty() && !ctx.config.json_output {
        println!("{empty}");
        return;
    }
    report::print_table(
        ctx.config,
        &["Package", "Available", "Installed"],
        &upgrade_rows(rows),
        &[24, 24, 24],
    );
}

pub(super) fn newupgrades(ctx: &Context, _args: &[String]) -> Result<()> {
    warn_if_stale(ctx)?;
    let (previous, available) = load_pair(ctx)?;
    let installed = packages::installed(ctx.shell)?;
    let rows = diff::diff_upgraded(&previous, &available, &installed);
    print_upgrades(ctx, rows, "No new upgrades");
    Ok(())
}

pub(super) fn toupgrade(ctx: &Context, _args: &[String]) -> Result<()> {
    let available = ctx.store.load_or_empty(SnapshotId::Available)?;
    let installed = packages::installed(ctx.shell)?;
    let rows = diff::to_upgrade(&available, &installed);
    print_upgrades(ctx, rows, "All installed packages are up to date");
    Ok(())
}

fn new_names(ctx: &Context) -> Result<Vec<String>> {
    let (previous, available) = load_pair(ctx)?;
    Ok(diff::diff_new(&previous, &available).into_iter().collect())
}

pub(super) fn describenew(ctx: &Context, _args: &[String]) -> Result<()> {
    let names = new_names(ctx)?;
    if names.is_empty() {
        println!("No new packages");
        return Ok(());
    }
    query::describe_packages(ctx, &names)
}

pub(super) fn newdetail(ctx: &Context, _args: &[String]) -> Result<()> {
    let names = new_names(ctx)?;
    if names.is_empty() {
        println!("No new packages");
        return Ok(());
    }
    query::show_packages(ctx, &names)
}

/// One row per package: installed, previous and available version plus
/// the dpkg selection state.
fn status_rows(
    names: &[String],
    installed: &Snapshot,
    previous: &Snapshot,
    available: &Snapshot,
    selections: &BTreeMap<String, String>,
) -> Vec<Vec<String>> {
    let or_na = |v: Option<&str>| v.unwrap_or(NOT_AVAILABLE).to_string();
    names
        .iter()
        .map(|name| {
            vec![
                name.clone(),
                or_na(installed.get(name)),
                or_na(previous.get(name)),
                or_na(available.get(name)),
                selections.get(name).cloned().unwrap_or_default(),
            ]
        })
        .collect()
}

/// Prints the status table for the names `pick` chooses from the
/// installed set.
fn print_status(ctx: &Context, pick: impl FnOnce(&Snapshot) -> Vec<String>) -> Result<()> {
    let installed = packages::installed(ctx.shell)?;
    let selections = packages::selections(ctx.shell)?;
    let (previous, available) = load_pair(ctx)?;
    let names = pick(&installed);

    report::print_table(
        ctx.config,
        &["Package", "Installed", "Previous", "Now", "State"],
        &status_rows(&names, &installed, &previous, &available, &selections),
        &[23, 15, 15, 15, 5],
    );
    Ok(())
}

pub(super) fn status(ctx: &Context, args: &[String]) -> Result<()> {
    print_status(ctx, |installed| {
        if args.is_empty() {
            installed.names().map(str::to_string).collect()
        } else {
            args.to_vec()
        }
    })
}

/// Installed packages whose name contains the pattern.
fn matching_installed(installed: &Snapshot, pattern: &str) -> Vec<String> {
    installed
        .names()
        .filter(|name| name.contains(pattern))
        .map(str::to_string)
        .collect()
}

pub(super) fn statussearch(ctx: &Context, args: &[String]) -> Result<()> {
    print_status(ctx, |installed| matching_installed(installed, &args[0]))
}

pub(super) fn snapshot(ctx: &Context, _args: &[String]) -> Result<()> {
    let installed = packages::installed(ctx.shell)?;
    for (name, version) in installed.iter() {
        println!("{name}={version}");
    }
    Ok(())
}

pub(super) fn lastupdate(ctx: &Context, _args: &[String]) -> Result<()> {
    let Some(updated) = ctx.store.last_update()? else {
        println!("No update has been recorded yet, run 'jig update'");
        return Ok(());
    };

    let when = chrono::DateTime::<chrono::Local>::from(updated)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let age = SystemTime::now().duration_since(updated).unwrap_or_default();
    println!(
        "{when} ({} ago)",
        humantime::format_duration(Duration::from_secs(age.as_secs()))
    );
    Ok(())
}

/// Starts the history over: both snapshots become the current archive
/// contents, so nothing is reported as new until the next update.
pub(super) fn reset(ctx: &Context, _args: &[String]) -> Result<()> {
    if ctx.config.simulate {
        println!("would reset snapshots in {}", ctx.store.dir().display());
        return Ok(());
    }

    let available = packages::available(ctx.shell)?;
    ctx.store.reset()?;
    ctx.store.save(SnapshotId::Previous, &available)?;
    ctx.store.save(SnapshotId::Available, &available)?;
    println!(
        "Recorded {} available packages in {}",
        report::format_thousands(available.len() as u64),
        ctx.store.dir().display()
    );
    Ok(())
}

pub(super) fn autodownload(ctx: &Context, args: &[String]) -> Result<()> {
    update(ctx, args)?;
    let command = apt_get(
        ctx.config,
        &["--download-only", "--show-upgraded", "--assume-yes"],
        "dist-upgrade",
        &[],
    );
    ctx.shell.run_checked(&command, Options::root())?;
    describenew(ctx, args)?;
    newupgrades(ctx, args)
}

pub(super) fn dailyupgrade(ctx: &Context, args: &[String]) -> Result<()> {
    update(ctx, args)?;
    let command = apt_get(ctx.config, &["--show-upgraded"], "dist-upgrade", &[]);
    ctx.shell.run_checked(&command, Options::root())
}
