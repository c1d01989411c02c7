//! Sources, alternatives, system checks and jig's own help.

use std::fs;
use std::io;
use std::path::Path;

use super::{require_tool, resolve, Context, COMMANDS};
use crate::error::{JigError, Result};
use crate::exec::{quote_all, Options};

const INIT_DIR: &str = "/etc/init.d";

pub(super) fn addcdrom(ctx: &Context, _args: &[String]) -> Result<()> {
    ctx.shell.run_checked("apt-cdrom add", Options::root())
}

pub(super) fn addrepo(ctx: &Context, args: &[String]) -> Result<()> {
    require_tool("software-properties-common", "/usr/bin/add-apt-repository")?;
    let command = format!("add-apt-repository {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::root())
}

pub(super) fn autoalts(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("update-alternatives --auto {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::root())
}

pub(super) fn listalts(ctx: &Context, _args: &[String]) -> Result<()> {
    ctx.shell.run_checked("update-alternatives --get-selections", Options::new())
}

pub(super) fn updatealts(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("update-alternatives --config {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::root())
}

pub(super) fn integrity(ctx: &Context, _args: &[String]) -> Result<()> {
    require_tool("debsums", "/usr/bin/debsums")?;
    ctx.shell.run_checked("debsums --all --silent", Options::new())
}

pub(super) fn reportbug(ctx: &Context, args: &[String]) -> Result<()> {
    require_tool("reportbug", "/usr/bin/reportbug")?;
    let command = format!("reportbug --bts=debian {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

/// Opens sources.list and friends in the user's editor.
pub(super) fn editsources(ctx: &Context, _args: &[String]) -> Result<()> {
    ctx.shell.run_checked("apt edit-sources", Options::root())
}

/// Service scripts under an init.d directory, by name.
fn daemons(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut names = Vec::new();
    for entry in entries {
        let name = entry?.file_name().to_string_lossy().into_owned();
        let helper = name.starts_with('.')
            || name.starts_with("rc")
            || name.ends_with(".sh")
            || matches!(name.as_str(), "README" | "skeleton" | "functions");
        if !helper {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

pub(super) fn listdaemons(_ctx: &Context, _args: &[String]) -> Result<()> {
    for name in daemons(Path::new(INIT_DIR))? {
        println!("{name}");
    }
    Ok(())
}

fn service(ctx: &Context, name: &str, action: &str) -> Result<()> {
    let command = format!("service {} {action}", quote_all([name]));
    ctx.shell.run_checked(&command, Options::root())
}

pub(super) fn start(ctx: &Context, args: &[String]) -> Result<()> {
    service(ctx, &args[0], "start")
}

pub(super) fn stop(ctx: &Context, args: &[String]) -> Result<()> {
    service(ctx, &args[0], "stop")
}

pub(super) fn restart(ctx: &Context, args: &[String]) -> Result<()> {
    service(ctx, &args[0], "restart")
}

pub(super) fn reload(ctx: &Context, args: &[String]) -> Result<()> {
    service(ctx, &args[0], "reload")
}

fn listing(common_only: bool) -> String {
    COMMANDS
        .iter()
        .filter(|entry| entry.common || !common_only)
        .map(|entry| format!(" {:<18}{}\n", entry.name, entry.summary))
        .collect()
}

/// Text for `jig` with no command and for plain `jig help`.
pub fn overview(all: bool) -> String {
    let heading = if all { "Commands:" } else { "Common commands:" };
    let footer = if all {
        ""
    } else {
        "\nRun 'jig commands' for the full list, 'jig help <command>' for details.\n"
    };
    format!(
        "jig {}: a command line front end to apt-get and dpkg\n\n{heading}\n{}{footer}",
        env!("CARGO_PKG_VERSION"),
        listing(!all)
    )
}

pub(super) fn help(ctx: &Context, args: &[String]) -> Result<()> {
    if args.is_empty() {
        print!("{}", overview(ctx.config.verbosity > 0));
        return Ok(());
    }

    for verb in args {
        let (entry, _) = resolve(verb).ok_or_else(|| JigError::UnknownCommand { verb: verb.clone() })?;
        println!("{}\n  {}", entry.synopsis, entry.summary);
    }
    Ok(())
}

pub(super) fn commands(_ctx: &Context, _args: &[String]) -> Result<()> {
    print!("{}", listing(false));
    Ok(())
}

pub(super) fn version(_ctx: &Context, _args: &[String]) -> Result<()> {
    println!("jig {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
