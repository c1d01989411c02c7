//! Installing, removing and repairing packages.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{apt_get, command_line, require_tool, Context};
use crate::config::Config;
use crate::error::{JigError, Result};
use crate::exec::{quote_all, Options};
use crate::packages;
use crate::report;

const ARCHIVES: &str = "/var/cache/apt/archives";

fn is_url(arg: &str) -> bool {
    ["http://", "https://", "ftp://"]
        .iter()
        .any(|scheme| arg.starts_with(scheme))
}

fn is_deb(arg: &str) -> bool {
    arg.ends_with(".deb")
}

fn apt_root(ctx: &Context, options: &[&str], action: &str, packages: &[String]) -> Result<()> {
    let command = apt_get(ctx.config, options, action, packages);
    ctx.shell.run_checked(&command, Options::root())
}

/// `apt-get install`, honouring a target release from `install/<dist>`.
fn install_names(ctx: &Context, extra: &[&str], names: &[String]) -> Result<()> {
    let mut options: Vec<&str> = extra.to_vec();
    if let Some(dist) = ctx.dist.as_deref() {
        options.extend(["--target-release", dist]);
    }
    apt_root(ctx, &options, "install", names)
}

/// `dpkg --install`, repairing missing dependencies with apt when it fails.
fn install_debs(ctx: &Context, files: &[String]) -> Result<()> {
    let command = format!("dpkg --install {}", quote_all(files));
    let status = ctx.shell.run(&command, Options::root())?;
    if status.success() {
        return Ok(());
    }

    warn!(code = ?status.code(), "dpkg --install failed, trying to fix dependencies");
    apt_root(ctx, &["--fix-broken"], "install", &[])
}

fn install_url(ctx: &Context, url: &str) -> Result<()> {
    require_tool("wget", "/usr/bin/wget")?;

    // removed when dropped, after dpkg is done with it
    let download = tempfile::Builder::new().prefix("jig-").suffix(".deb").tempfile()?;
    let path = download.path().to_string_lossy().into_owned();

    let fetch = format!("wget --output-document={} {}", quote_all([&path]), quote_all([url]));
    ctx.shell.run_checked(&fetch, Options::new())?;
    install_debs(ctx, &[path])
}

fn read_names(reader: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        names.extend(line.split_whitespace().map(str::to_string));
    }
    Ok(names)
}

pub(super) fn install(ctx: &Context, args: &[String]) -> Result<()> {
    if args.len() == 1 && args[0] == "-" {
        let names = read_names(io::stdin().lock())?;
        if names.is_empty() {
            debug!("no package names on stdin");
            return Ok(());
        }
        return install_names(ctx, &[], &names);
    }

    if args.iter().any(|a| is_url(a)) {
        if args.len() != 1 {
            return Err(JigError::Arity {
                command: "install".to_string(),
                usage: "exactly one URL".to_string(),
            });
        }
        return install_url(ctx, &args[0]);
    }

    let (debs, names): (Vec<String>, Vec<String>) = args.iter().cloned().partition(|a| is_deb(a));
    if !debs.is_empty() {
        install_debs(ctx, &debs)?;
    }
    if names.is_empty() {
        return Ok(());
    }
    install_names(ctx, &[], &names)
}

pub(super) fn installfile(ctx: &Context, args: &[String]) -> Result<()> {
    let file = fs::File::open(&args[0])?;
    let names = read_names(io::BufReader::new(file))?;
    if names.is_empty() {
        println!("No package names found in {}", args[0]);
        return Ok(());
    }
    install_names(ctx, &[], &names)
}

/// Package names from `apt-cache depends` lines of the given kind.
fn dependency_names(lines: impl IntoIterator<Item = String>, kind: &str) -> Vec<String> {
    let prefix = format!("{kind}:");
    let mut names: Vec<String> = lines
        .into_iter()
        .filter_map(|line| {
            let rest = line.trim().trim_start_matches('|').strip_prefix(&prefix)?.trim().to_string();
            // virtual packages print as <name>
            (!rest.is_empty() && !rest.starts_with('<')).then_some(rest)
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

pub(super) fn installsuggest(ctx: &Context, args: &[String]) -> Result<()> {
    let query = format!("apt-cache depends {}", quote_all(args));
    let lines = ctx.shell.capture_checked(&query, Options::new().quiet().locale_c())?;

    let mut names = args.to_vec();
    names.extend(dependency_names(lines, "Suggests"));
    install_names(ctx, &[], &names)
}

/// Always installs recommends, whatever `-r`/`-R` or the config file say.
pub(super) fn installrecommend(ctx: &Context, args: &[String]) -> Result<()> {
    let config = Config {
        recommends: Some(true),
        ..ctx.config.clone()
    };
    let ctx = Context {
        config: &config,
        shell: ctx.shell,
        store: ctx.store,
        dist: ctx.dist.clone(),
    };
    install_names(&ctx, &[], args)
}

pub(super) fn autoinstall(ctx: &Context, args: &[String]) -> Result<()> {
    let extra: &[&str] = if ctx.config.yes { &[] } else { &["--assume-yes"] };
    install_names(ctx, extra, args)
}

pub(super) fn reinstall(ctx: &Context, args: &[String]) -> Result<()> {
    install_names(ctx, &["--reinstall"], args)
}

/// Newest cached archive for `name`, by file name order.
fn cached_archive(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let prefix = format!("{name}_");
    let mut matches: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| f.starts_with(&prefix) && f.ends_with(".deb"))
            })
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    matches.sort();
    Ok(matches.pop())
}

fn force_file(arg: &str, archives: &Path) -> Result<PathBuf> {
    let direct = PathBuf::from(arg);
    if direct.exists() {
        return Ok(direct);
    }
    let cached = archives.join(arg);
    if cached.exists() {
        return Ok(cached);
    }
    Err(io::Error::new(io::ErrorKind::NotFound, format!("file not found: {arg}")).into())
}

fn force_name(ctx: &Context, name: &str, archives: &Path) -> Result<PathBuf> {
    if let Some(path) = cached_archive(archives, name)? {
        return Ok(path);
    }

    let fetch = apt_get(
        ctx.config,
        &["--quiet=2", "--reinstall", "--download-only"],
        "install",
        &[name.to_string()],
    );
    ctx.shell.run_checked(&fetch, Options::root())?;

    cached_archive(archives, name)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no archive for {name} in {}", archives.display()),
        )
        .into()
    })
}

fn force_in(ctx: &Context, args: &[String], archives: &Path) -> Result<()> {
    let mut files = Vec::with_capacity(args.len());
    for arg in args {
        let path = if is_deb(arg) {
            force_file(arg, archives)?
        } else {
            force_name(ctx, arg, archives)?
        };
        files.push(path.to_string_lossy().into_owned());
    }

    let command = format!("dpkg --install --force-overwrite --force-depends {}", quote_all(&files));
    ctx.shell.run_checked(&command, Options::root())
}

pub(super) fn force(ctx: &Context, args: &[String]) -> Result<()> {
    force_in(ctx, args, Path::new(ARCHIVES))
}

/// `.deb` files in the download cache, with sizes in KB, by name.
fn cache_listing(dir: &Path, pattern: Option<&str>) -> Result<Vec<(String, u64)>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_deb(&name) || pattern.is_some_and(|p| !name.contains(p)) {
            continue;
        }
        files.push((name, entry.metadata()?.len() / 1024));
    }
    files.sort();
    Ok(files)
}

fn listcache_in(ctx: &Context, args: &[String], archives: &Path) -> Result<()> {
    let rows: Vec<Vec<String>> = cache_listing(archives, args.first().map(String::as_str))?
        .into_iter()
        .map(|(name, kb)| vec![name, report::format_thousands(kb)])
        .collect();
    if rows.is_empty() && !ctx.config.json_output {
        println!("No package files in {}", archives.display());
        return Ok(());
    }
    report::print_table(ctx.config, &["File", "Size (KB)"], &rows, &[60, 10]);
    Ok(())
}

pub(super) fn listcache(ctx: &Context, args: &[String]) -> Result<()> {
    listcache_in(ctx, args, Path::new(ARCHIVES))
}

/// Packages named in `args` and everything they depend on, depth first.
/// An argument ending in `-` is walked but not downloaded.
fn dependency_closure(graph: &BTreeMap<String, Vec<String>>, args: &[String]) -> Vec<String> {
    let skipped: BTreeSet<&str> = args.iter().filter_map(|a| a.strip_suffix('-')).collect();
    let mut pending: Vec<&str> = args
        .iter()
        .filter(|a| !a.ends_with('-'))
        .rev()
        .map(String::as_str)
        .collect();

    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    while let Some(name) = pending.pop() {
        if !seen.insert(name) {
            continue;
        }
        if !skipped.contains(name) {
            order.push(name.to_string());
        }
        if let Some(depends) = graph.get(name) {
            pending.extend(depends.iter().rev().map(String::as_str));
        }
    }
    order
}

pub(super) fn recursive(ctx: &Context, args: &[String]) -> Result<()> {
    let graph = packages::dependencies(ctx.shell)?;
    let names = dependency_closure(&graph, args);
    if names.is_empty() {
        println!("Nothing to download");
        return Ok(());
    }
    println!("Packages to download to {ARCHIVES}:\n{}\n", names.join(" "));
    apt_root(ctx, &["--download-only", "--reinstall", "--show-upgraded"], "install", &names)
}

/// Runs the action under apt-get's simulator, so nothing changes.
fn trace(ctx: &Context, action: &str, packages: &[String]) -> Result<()> {
    let command = apt_get(ctx.config, &["--show-upgraded", "--simulate"], action, packages);
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn showinstall(ctx: &Context, args: &[String]) -> Result<()> {
    trace(ctx, "install", args)
}

pub(super) fn showremove(ctx: &Context, args: &[String]) -> Result<()> {
    trace(ctx, "remove", args)
}

pub(super) fn showupgrade(ctx: &Context, _args: &[String]) -> Result<()> {
    trace(ctx, "upgrade", &[])
}

pub(super) fn showdistupgrade(ctx: &Context, _args: &[String]) -> Result<()> {
    trace(ctx, "dist-upgrade", &[])
}

pub(super) fn remove(ctx: &Context, args: &[String]) -> Result<()> {
    apt_root(ctx, &[], "remove", args)
}

pub(super) fn purge(ctx: &Context, args: &[String]) -> Result<()> {
    apt_root(ctx, &[], "purge", args)
}

fn orphan_names(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn drop_orphans(ctx: &Context, action: &str) -> Result<()> {
    require_tool("deborphan", "/usr/bin/deborphan")?;
    let names = orphan_names(ctx.shell.capture_checked("deborphan", Options::new().quiet())?);
    drop_all(ctx, action, &names, "No orphaned libraries")
}

fn drop_all(ctx: &Context, action: &str, names: &[String], none: &str) -> Result<()> {
    if names.is_empty() {
        println!("{none}");
        return Ok(());
    }
    apt_root(ctx, &[], action, names)
}

pub(super) fn removeorphans(ctx: &Context, _args: &[String]) -> Result<()> {
    drop_orphans(ctx, "remove")
}

pub(super) fn purgeorphans(ctx: &Context, _args: &[String]) -> Result<()> {
    drop_orphans(ctx, "purge")
}

/// Purges whatever was removed but left configuration files behind.
pub(super) fn purgeremoved(ctx: &Context, _args: &[String]) -> Result<()> {
    let names = packages::removed(ctx.shell)?;
    drop_all(ctx, "purge", &names, "No removed packages have configuration files left")
}

pub(super) fn reconfigure(ctx: &Context, args: &[String]) -> Result<()> {
    if args.is_empty() {
        require_tool("gkdebconf", "/usr/bin/gkdebconf")?;
        return ctx.shell.run_checked("gkdebconf", Options::root());
    }
    let command = format!("dpkg-reconfigure {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::root())
}

/// Rebuilds .deb files for installed packages into the current directory.
pub(super) fn repackage(ctx: &Context, args: &[String]) -> Result<()> {
    require_tool("dpkg-repack", "/usr/bin/dpkg-repack")?;
    require_tool("fakeroot", "/usr/bin/fakeroot")?;
    let command = format!("fakeroot --unknown-is-real dpkg-repack {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn autoremove(ctx: &Context, _args: &[String]) -> Result<()> {
    apt_root(ctx, &[], "autoremove", &[])
}

pub(super) fn autoclean(ctx: &Context, _args: &[String]) -> Result<()> {
    apt_root(ctx, &[], "autoclean", &[])
}

pub(super) fn clean(ctx: &Context, _args: &[String]) -> Result<()> {
    apt_root(ctx, &[], "clean", &[])
}

pub(super) fn upgrade(ctx: &Context, _args: &[String]) -> Result<()> {
    apt_root(ctx, &["--show-upgraded"], "upgrade", &[])
}

pub(super) fn distupgrade(ctx: &Context, args: &[String]) -> Result<()> {
    let mut options = vec!["--show-upgraded"];
    if let Some(dist) = args.first() {
        options.extend(["--target-release", dist.as_str()]);
    }
    apt_root(ctx, &options, "dist-upgrade", &[])
}

/// Fetches .deb files into the current directory; no root needed.
pub(super) fn download(ctx: &Context, args: &[String]) -> Result<()> {
    let command = apt_get(ctx.config, &[], "download", args);
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn source(ctx: &Context, args: &[String]) -> Result<()> {
    let command = apt_get(ctx.config, &[], "source", args);
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn builddeps(ctx: &Context, args: &[String]) -> Result<()> {
    apt_root(ctx, &[], "build-dep", args)
}

pub(super) fn build(ctx: &Context, args: &[String]) -> Result<()> {
    builddeps(ctx, args)?;
    let command = apt_get(ctx.config, &["--build"], "source", args);
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn fixconfigure(ctx: &Context, _args: &[String]) -> Result<()> {
    ctx.shell.run_checked("dpkg --configure -a", Options::root())
}

pub(super) fn fixinstall(ctx: &Context, _args: &[String]) -> Result<()> {
    apt_root(ctx, &["--fix-broken"], "install", &[])
}

pub(super) fn fixmissing(ctx: &Context, _args: &[String]) -> Result<()> {
    apt_root(ctx, &["--fix-missing"], "upgrade", &[])
}

fn set_selection(ctx: &Context, names: &[String], state: &str) -> Result<()> {
    for name in names {
        let selection = quote_all([format!("{name} {state}")]);
        let command = command_line(&["echo", &selection, "|", "dpkg --set-selections"]);
        ctx.shell.run_checked(&command, Options::root())?;
    }
    listhold(ctx, &[])
}

pub(super) fn hold(ctx: &Context, args: &[String]) -> Result<()> {
    set_selection(ctx, args, "hold")
}

pub(super) fn unhold(ctx: &Context, args: &[String]) -> Result<()> {
    set_selection(ctx, args, "install")
}

pub(super) fn listhold(ctx: &Context, _args: &[String]) -> Result<()> {
    let held = packages::held(ctx.shell)?;
    if held.is_empty() {
        println!("No packages are on hold");
        return Ok(());
    }
    println!("The following packages are on hold:");
    for name in held {
        println!("  {name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::exec::testing::FakeInvoker;
    use crate::packages::SELECTIONS_QUERY;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn names_go_to_apt_get_install_as_root() {
        let harness = Harness::with_config(|c| c.yes = true);
        let shell = FakeInvoker::new();
        install(&harness.context(&shell), &args(&["vim", "ripgrep"])).unwrap();

        let calls = shell.calls.borrow();
        assert_eq!(calls[0].0, "apt-get --assume-yes install vim ripgrep");
        assert!(calls[0].1.elevate);
    }

    #[test]
    fn deb_files_fall_back_to_fix_broken() {
        let harness = Harness::new();
        let shell = FakeInvoker::new().with_status("dpkg --install", 1);
        install(&harness.context(&shell), &args(&["./tool_1.0_amd64.deb"])).unwrap();
        assert_eq!(
            shell.commands(),
            vec!["dpkg --install ./tool_1.0_amd64.deb", "apt-get --fix-broken install"]
        );
    }

    #[test]
    fn mixed_files_and_names_each_go_to_their_tool() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        let mixed = args(&["vim", "./tool_1.0_amd64.deb", "ripgrep"]);
        install(&harness.context(&shell), &mixed).unwrap();
        assert_eq!(
            shell.commands(),
            vec!["dpkg --install ./tool_1.0_amd64.deb", "apt-get install vim ripgrep"]
        );
    }

    #[test]
    fn installrecommend_overrides_no_recommends() {
        let harness = Harness::with_config(|c| c.recommends = Some(false));
        let shell = FakeInvoker::new();
        installrecommend(&harness.context(&shell), &args(&["vim"])).unwrap();
        assert_eq!(shell.commands(), vec!["apt-get --install-recommends install vim"]);

        let harness = Harness::new();
        let shell = FakeInvoker::new();
        installrecommend(&harness.context(&shell), &args(&["vim"])).unwrap();
        assert_eq!(shell.commands(), vec!["apt-get --install-recommends install vim"]);
    }

    #[test]
    fn only_one_url_at_a_time() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        let err = install(
            &harness.context(&shell),
            &args(&["https://example.org/a.deb", "https://example.org/b.deb"]),
        )
        .unwrap_err();
        assert!(matches!(err, JigError::Arity { .. }));
        assert!(shell.commands().is_empty());
    }

    #[test]
    fn installfile_reads_whitespace_separated_names() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("packages.txt");
        fs::write(&list, "vim  git\n\nripgrep\n").unwrap();

        let harness = Harness::new();
        let shell = FakeInvoker::new();
        installfile(&harness.context(&shell), &[list.to_string_lossy().into_owned()]).unwrap();
        assert_eq!(shell.commands(), vec!["apt-get install vim git ripgrep"]);
    }

    #[test]
    fn suggests_are_parsed_from_apt_cache_depends() {
        let lines = [
            "vim",
            "  Depends: vim-common",
            "  Suggests: ctags",
            " |Suggests: vim-doc",
            "  Suggests: <vim-scripts>",
            "  Recommends: xxd",
        ]
        .map(str::to_string);
        assert_eq!(dependency_names(lines, "Suggests"), vec!["ctags", "vim-doc"]);
    }

    #[test]
    fn force_downloads_when_archive_missing() {
        let archives = TempDir::new().unwrap();
        let harness = Harness::new();
        let shell = FakeInvoker::new();

        let err = force_in(&harness.context(&shell), &args(&["vim"]), archives.path()).unwrap_err();
        assert!(matches!(err, JigError::Io(_)));
        assert_eq!(
            shell.commands(),
            vec!["apt-get --quiet=2 --reinstall --download-only install vim"]
        );
    }

    #[test]
    fn force_picks_newest_cached_archive() {
        let archives = TempDir::new().unwrap();
        fs::write(archives.path().join("vim_2%3a9.0-1_amd64.deb"), b"").unwrap();
        fs::write(archives.path().join("vim_2%3a9.1-1_amd64.deb"), b"").unwrap();
        fs::write(archives.path().join("vim-common_2%3a9.1-1_all.deb"), b"").unwrap();

        let harness = Harness::new();
        let shell = FakeInvoker::new();
        force_in(&harness.context(&shell), &args(&["vim"]), archives.path()).unwrap();

        let commands = shell.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("dpkg --install --force-overwrite --force-depends "));
        assert!(commands[0].contains("vim_2%3a9.1-1_amd64.deb"));
    }

    #[test]
    fn distupgrade_takes_optional_release() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        distupgrade(&harness.context(&shell), &args(&["trixie"])).unwrap();
        assert_eq!(
            shell.commands(),
            vec!["apt-get --show-upgraded --target-release trixie dist-upgrade"]
        );
    }

    #[test]
    fn hold_sets_selection_then_lists() {
        let harness = Harness::new();
        let shell = FakeInvoker::new().with_output(SELECTIONS_QUERY, &["linux-image-amd64\thold"]);
        hold(&harness.context(&shell), &args(&["linux-image-amd64"])).unwrap();
        let commands = shell.commands();
        assert_eq!(commands[0], "echo 'linux-image-amd64 hold' | dpkg --set-selections");
        assert_eq!(commands[1], SELECTIONS_QUERY);
    }

    #[test]
    fn show_commands_simulate_without_root() {
        let harness = Harness::with_config(|c| c.yes = true);
        let shell = FakeInvoker::new();
        let ctx = harness.context(&shell);
        showinstall(&ctx, &args(&["vim"])).unwrap();
        showremove(&ctx, &args(&["nano"])).unwrap();
        showupgrade(&ctx, &[]).unwrap();
        showdistupgrade(&ctx, &[]).unwrap();

        assert_eq!(
            shell.commands(),
            vec![
                "apt-get --assume-yes --show-upgraded --simulate install vim",
                "apt-get --assume-yes --show-upgraded --simulate remove nano",
                "apt-get --assume-yes --show-upgraded --simulate upgrade",
                "apt-get --assume-yes --show-upgraded --simulate dist-upgrade",
            ]
        );
        assert!(shell.calls.borrow().iter().all(|(_, options)| !options.elevate));
    }

    #[test]
    fn dependency_closure_walks_depth_first_and_skips_marked() {
        let graph = BTreeMap::from([
            ("git".to_string(), args(&["libc6", "git-man", "perl"])),
            ("git-man".to_string(), Vec::new()),
            ("perl".to_string(), args(&["libc6", "perl-base"])),
            ("libc6".to_string(), args(&["libgcc-s1"])),
        ]);
        assert_eq!(
            dependency_closure(&graph, &args(&["git"])),
            vec!["git", "libc6", "libgcc-s1", "git-man", "perl", "perl-base"]
        );
        assert_eq!(
            dependency_closure(&graph, &args(&["git", "libc6-"])),
            vec!["git", "libgcc-s1", "git-man", "perl", "perl-base"]
        );
    }

    #[test]
    fn recursive_downloads_whole_closure_as_root() {
        let harness = Harness::new();
        let shell = FakeInvoker::new().with_output(
            packages::AVAILABLE_QUERY,
            &[
                "Package: hello",
                "Depends: libc6 (>= 2.34)",
                "",
                "Package: libc6",
                "Depends: libgcc-s1",
            ],
        );
        recursive(&harness.context(&shell), &args(&["hello"])).unwrap();

        let calls = shell.calls.borrow();
        assert_eq!(
            calls[1].0,
            "apt-get --download-only --reinstall --show-upgraded install hello libc6 libgcc-s1"
        );
        assert!(calls[1].1.elevate);
    }

    #[test]
    fn purgeremoved_purges_deinstalled_packages() {
        let harness = Harness::new();
        let shell = FakeInvoker::new().with_output(
            SELECTIONS_QUERY,
            &["bash\tinstall", "oldlib\tdeinstall", "olddoc\tdeinstall"],
        );
        purgeremoved(&harness.context(&shell), &[]).unwrap();
        assert_eq!(shell.commands(), vec![SELECTIONS_QUERY, "apt-get purge olddoc oldlib"]);

        let shell = FakeInvoker::new().with_output(SELECTIONS_QUERY, &["bash\tinstall"]);
        purgeremoved(&harness.context(&shell), &[]).unwrap();
        assert_eq!(shell.commands(), vec![SELECTIONS_QUERY]);
    }

    #[test]
    fn orphan_names_ignore_blank_lines() {
        let lines = vec!["libfoo1".to_string(), "  ".to_string(), " libbar2 ".to_string()];
        assert_eq!(orphan_names(lines), vec!["libfoo1", "libbar2"]);
    }

    #[test]
    fn reconfigure_runs_dpkg_reconfigure_as_root() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        reconfigure(&harness.context(&shell), &args(&["tzdata", "locales"])).unwrap();
        let calls = shell.calls.borrow();
        assert_eq!(calls[0].0, "dpkg-reconfigure tzdata locales");
        assert!(calls[0].1.elevate);
    }

    #[test]
    fn listcache_filters_and_sizes_debs() {
        let archives = TempDir::new().unwrap();
        fs::write(archives.path().join("vim_9.1_amd64.deb"), vec![0u8; 4096]).unwrap();
        fs::write(archives.path().join("bash_5.2_amd64.deb"), vec![0u8; 2048]).unwrap();
        fs::write(archives.path().join("lock"), b"").unwrap();
        fs::create_dir(archives.path().join("partial")).unwrap();

        let all = cache_listing(archives.path(), None).unwrap();
        assert_eq!(
            all,
            vec![("bash_5.2_amd64.deb".to_string(), 2), ("vim_9.1_amd64.deb".to_string(), 4)]
        );
        assert_eq!(cache_listing(archives.path(), Some("vim")).unwrap().len(), 1);
        assert!(cache_listing(&archives.path().join("missing"), None).unwrap().is_empty());

        let harness = Harness::new();
        let shell = FakeInvoker::new();
        listcache_in(&harness.context(&shell), &[], archives.path()).unwrap();
        assert!(shell.commands().is_empty());
    }

    #[test]
    fn download_does_not_need_root() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        download(&harness.context(&shell), &args(&["hello"])).unwrap();
        let calls = shell.calls.borrow();
        assert_eq!(calls[0].0, "apt-get download hello");
        assert!(!calls[0].1.elevate);
    }
}
