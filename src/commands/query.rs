//! Read-only questions about packages, installed or available.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{command_line, require_tool, Context};
use crate::control::{stanzas, Stanza};
use crate::error::Result;
use crate::exec::{quote_all, Options};
use crate::packages::{self, SizeEntry};
use crate::report::{self, table::truncate};
use crate::store::Snapshot;

const DOC_DIR: &str = "/usr/share/doc";
const DPKG_INFO_DIR: &str = "/var/lib/dpkg/info";
const CONTROL_SCRIPTS: [&str; 4] = ["preinst", "postinst", "prerm", "postrm"];
const LARGE_KB: u64 = 10_000;
const DPKG_LOG: &str = "/var/log/dpkg.log";
const LOGGED_ACTIONS: [&str; 4] = ["install", "upgrade", "remove", "purge"];

fn quiet_query() -> Options {
    Options::new().quiet().locale_c()
}

fn split_debs(args: &[String]) -> (Vec<String>, Vec<String>) {
    args.iter().cloned().partition(|a| a.ends_with(".deb"))
}

fn deb_info(ctx: &Context, files: &[String]) -> Result<()> {
    for file in files {
        println!("{}", report::banner(file));
        let command = format!("dpkg-deb --info {}", quote_all([file]));
        ctx.shell.run_checked(&command, Options::new())?;
    }
    Ok(())
}

/// One row per distinct package, in the order apt-cache printed them.
fn describe_rows(paragraphs: impl Iterator<Item = Stanza>, width: Option<usize>) -> Vec<Vec<String>> {
    let mut seen = BTreeSet::new();
    paragraphs
        .filter_map(|stanza| {
            let name = stanza.get("Package")?.to_string();
            if !seen.insert(name.clone()) {
                return None;
            }
            let summary = stanza.summary().unwrap_or_default();
            let summary = match width {
                Some(w) => truncate(summary, w),
                None => summary.to_string(),
            };
            Some(vec![name, summary])
        })
        .collect()
}

pub(super) fn describe_packages(ctx: &Context, names: &[String]) -> Result<()> {
    let command = format!("apt-cache show --no-all-versions {}", quote_all(names));
    let paragraphs = stanzas(ctx.shell.capture_checked(&command, quiet_query())?);

    if ctx.config.verbosity > 0 && !ctx.config.json_output {
        let mut seen = BTreeSet::new();
        for stanza in paragraphs {
            let Some(name) = stanza.get("Package") else { continue };
            if !seen.insert(name.to_string()) {
                continue;
            }
            println!("{name}: {}", stanza.summary().unwrap_or_default());
            if let Some(long) = stanza.long_description() {
                for line in long.lines() {
                    println!("  {line}");
                }
            }
            println!();
        }
        return Ok(());
    }

    let width = (!ctx.config.json_output).then_some(51);
    report::print_table(
        ctx.config,
        &["Package", "Description"],
        &describe_rows(paragraphs, width),
        &[24, 51],
    );
    Ok(())
}

pub(super) fn describe(ctx: &Context, args: &[String]) -> Result<()> {
    let (files, names) = split_debs(args);
    deb_info(ctx, &files)?;
    if names.is_empty() {
        return Ok(());
    }
    describe_packages(ctx, &names)
}

pub(super) fn show_packages(ctx: &Context, names: &[String]) -> Result<()> {
    let tool = if ctx.config.fast || !Path::new("/usr/bin/aptitude").exists() {
        "apt-cache"
    } else {
        "aptitude"
    };
    debug!(tool, "showing package details");
    let command = format!("{tool} show {}", quote_all(names));
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn show(ctx: &Context, args: &[String]) -> Result<()> {
    let (files, names) = split_debs(args);
    deb_info(ctx, &files)?;
    if names.is_empty() {
        return Ok(());
    }
    show_packages(ctx, &names)
}

/// `name - summary` lines from apt-cache search.
fn search_rows(lines: impl IntoIterator<Item = String>, width: Option<usize>) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = lines
        .into_iter()
        .filter_map(|line| {
            let (name, summary) = line.split_once(" - ")?;
            let summary = summary.trim();
            let summary = width.map_or_else(|| summary.to_string(), |w| truncate(summary, w));
            Some(vec![name.trim().to_string(), summary])
        })
        .collect();
    rows.sort();
    rows
}

pub(super) fn search(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("apt-cache search {}", quote_all(args));
    let width = (ctx.config.verbosity == 0 && !ctx.config.json_output).then_some(51);
    let rows = search_rows(ctx.shell.capture_checked(&command, quiet_query())?, width);
    report::print_table(ctx.config, &["Package", "Description"], &rows, &[24, 51]);
    Ok(())
}

pub(super) fn listfiles(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("dpkg --listfiles {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

fn matching<'a>(names: impl Iterator<Item = &'a str>, pattern: Option<&str>) -> Vec<&'a str> {
    names
        .filter(|name| pattern.map_or(true, |p| name.contains(p)))
        .collect()
}

pub(super) fn listinstalled(ctx: &Context, args: &[String]) -> Result<()> {
    let installed = packages::installed(ctx.shell)?;
    for name in matching(installed.names(), args.first().map(String::as_str)) {
        println!("{name}");
    }
    Ok(())
}

pub(super) fn listnames(ctx: &Context, args: &[String]) -> Result<()> {
    let names: BTreeSet<String> = ctx
        .shell
        .capture_checked("apt-cache pkgnames", quiet_query())?
        .into_iter()
        .collect();
    for name in matching(names.iter().map(String::as_str), args.first().map(String::as_str)) {
        println!("{name}");
    }
    Ok(())
}

fn available_stanzas(ctx: &Context) -> Result<impl Iterator<Item = Stanza>> {
    Ok(stanzas(ctx.shell.capture_checked(packages::AVAILABLE_QUERY, quiet_query())?))
}

pub(super) fn listsections(ctx: &Context, _args: &[String]) -> Result<()> {
    let sections: BTreeSet<String> = available_stanzas(ctx)?
        .filter_map(|stanza| stanza.get("Section").map(str::to_string))
        .collect();
    for section in sections {
        println!("{section}");
    }
    Ok(())
}

/// `games` also matches `contrib/games` and `non-free/games`.
fn in_section(stanza: &Stanza, section: &str) -> bool {
    stanza.get("Section").is_some_and(|s| {
        s == section || s.rsplit_once('/').is_some_and(|(_, tail)| tail == section)
    })
}

pub(super) fn listsection(ctx: &Context, args: &[String]) -> Result<()> {
    let section = &args[0];
    let names: BTreeSet<String> = available_stanzas(ctx)?
        .filter(|stanza| in_section(stanza, section))
        .filter_map(|stanza| stanza.get("Package").map(str::to_string))
        .collect();
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub(super) fn listorphans(ctx: &Context, _args: &[String]) -> Result<()> {
    require_tool("deborphan", "/usr/bin/deborphan")?;
    ctx.shell.run_checked("deborphan", Options::new())
}

pub(super) fn whichpkg(ctx: &Context, args: &[String]) -> Result<()> {
    let target = &args[0];
    let path = if target.contains('/') {
        target.clone()
    } else {
        // a bare command name: search for the file it resolves to
        let lookup = format!("command -v {}", quote_all([target]));
        ctx.shell
            .capture(&lookup, Options::new().quiet())?
            .next()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| target.clone())
    };
    let command = format!("dpkg --search {}", quote_all([&path]));
    ctx.shell.run_checked(&command, Options::new())
}

fn first_existing(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(|c| dir.join(c)).find(|p| p.is_file())
}

fn changelog_in(ctx: &Context, package: &str, doc_dir: &Path) -> Result<()> {
    let command = format!("apt-get changelog {}", quote_all([package]));
    let status = ctx.shell.run(&command, Options::new())?;
    if status.success() {
        return Ok(());
    }

    let local = first_existing(&doc_dir.join(package), &["changelog.Debian.gz", "changelog.gz"]);
    match local {
        Some(path) => {
            eprintln!("warning: could not fetch the changelog, showing the installed copy");
            let command = format!("zcat {}", quote_all([path.to_string_lossy()]));
            ctx.shell.run_checked(&command, Options::new())
        }
        None => {
            eprintln!("Package {package} is likely broken (changelog not found)");
            status.check(&command)
        }
    }
}

pub(super) fn changelog(ctx: &Context, args: &[String]) -> Result<()> {
    changelog_in(ctx, &args[0], Path::new(DOC_DIR))
}

pub(super) fn contents(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("dpkg --contents {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn extract(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("dpkg-deb --extract {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn info(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("dpkg-deb --info {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn policy(ctx: &Context, args: &[String]) -> Result<()> {
    let quoted = quote_all(args);
    ctx.shell
        .run_checked(&command_line(&["apt-cache policy", &quoted]), Options::new())
}

pub(super) fn madison(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("apt-cache madison {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

/// Packages dpkg knows about in any state, optionally only the named ones,
/// smallest first. The status column tells removed ones apart.
fn size_rows(mut entries: Vec<SizeEntry>, names: &[String], min_kb: u64) -> Vec<Vec<String>> {
    entries.retain(|e| e.size_kb > min_kb && (names.is_empty() || names.contains(&e.name)));
    entries.sort_by(|a, b| a.size_kb.cmp(&b.size_kb).then_with(|| a.name.cmp(&b.name)));
    entries
        .into_iter()
        .map(|e| vec![e.name, report::format_thousands(e.size_kb), e.status])
        .collect()
}

fn print_sizes(ctx: &Context, names: &[String], min_kb: u64) -> Result<()> {
    let rows = size_rows(packages::sizes(ctx.shell)?, names, min_kb);
    if rows.is_empty() && !ctx.config.json_output {
        println!("No packages found from those known to be available or installed");
        return Ok(());
    }
    report::print_table(ctx.config, &["Package", "Size (KB)", "Status"], &rows, &[33, 10, 12]);
    Ok(())
}

pub(super) fn size(ctx: &Context, args: &[String]) -> Result<()> {
    print_sizes(ctx, args, 0)
}

pub(super) fn large(ctx: &Context, _args: &[String]) -> Result<()> {
    print_sizes(ctx, &[], LARGE_KB)
}

/// Installed and archive version of each named package.
fn available_rows(
    names: &[String],
    installed: &Snapshot,
    archive: &Snapshot,
) -> Vec<Vec<String>> {
    let or_na = |v: Option<&str>| v.unwrap_or("N/A").to_string();
    names
        .iter()
        .map(|name| vec![name.clone(), or_na(installed.get(name)), or_na(archive.get(name))])
        .collect()
}

pub(super) fn available(ctx: &Context, args: &[String]) -> Result<()> {
    let installed = packages::installed(ctx.shell)?;
    let archive = packages::available(ctx.shell)?;
    report::print_table(
        ctx.config,
        &["Package", "Installed", "Available"],
        &available_rows(args, &installed, &archive),
        &[24, 24, 24],
    );
    Ok(())
}

pub(super) fn liststatus(ctx: &Context, args: &[String]) -> Result<()> {
    let pattern = args.first().map(String::as_str);
    let rows: Vec<Vec<String>> = packages::status_list(ctx.shell)?
        .into_iter()
        .filter(|(_, name)| pattern.map_or(true, |p| name.contains(p)))
        .map(|(state, name)| vec![state, name])
        .collect();
    report::print_table(ctx.config, &["Status", "Package"], &rows, &[6, 40]);
    Ok(())
}

/// Install, upgrade, remove and purge lines of a dpkg log, oldest first.
fn log_entries(reader: impl BufRead, pattern: Option<&str>) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        // 2024-03-01 10:15:02 upgrade vim:amd64 2:9.0.1378-2 2:9.1.0016-1
        let action = line.split_whitespace().nth(2);
        if !action.is_some_and(|a| LOGGED_ACTIONS.contains(&a)) {
            continue;
        }
        if pattern.map_or(true, |p| line.contains(p)) {
            entries.push(line);
        }
    }
    Ok(entries)
}

fn listlog_in(args: &[String], log: &Path) -> Result<()> {
    let file = match fs::File::open(log) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!("No dpkg log at {}", log.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    for entry in log_entries(BufReader::new(file), args.first().map(String::as_str))? {
        println!("{entry}");
    }
    Ok(())
}

pub(super) fn listlog(_ctx: &Context, args: &[String]) -> Result<()> {
    listlog_in(args, Path::new(DPKG_LOG))
}

pub(super) fn dependents(ctx: &Context, args: &[String]) -> Result<()> {
    let command = format!("apt-cache rdepends {}", quote_all(args));
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn rbuilddeps(ctx: &Context, args: &[String]) -> Result<()> {
    require_tool("dctrl-tools", "/usr/bin/grep-dctrl")?;
    let command = format!(
        "grep-dctrl --show-field=Package --field=Build-Depends,Build-Depends-Indep {} /var/lib/apt/lists/*_Sources",
        quote_all(args)
    );
    ctx.shell.run_checked(&command, Options::new())
}

pub(super) fn versions(ctx: &Context, args: &[String]) -> Result<()> {
    require_tool("apt-show-versions", "/usr/bin/apt-show-versions")?;
    let quoted = quote_all(args);
    ctx.shell
        .run_checked(&command_line(&["apt-show-versions", &quoted]), Options::new())
}

/// Prints each existing file under a banner, decompressing `.gz` ones.
fn show_docs(ctx: &Context, package: &str, kind: &str, candidates: &[&str], doc_dir: &Path) -> Result<()> {
    let dir = doc_dir.join(package);
    let found: Vec<PathBuf> = candidates
        .iter()
        .map(|c| dir.join(c))
        .filter(|p| p.is_file())
        .collect();

    if found.is_empty() {
        println!("No {kind} found for {package}");
        return Ok(());
    }

    for path in found {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        println!("{}", report::banner(&name));
        if name.ends_with(".gz") {
            let command = format!("zcat {}", quote_all([path.to_string_lossy()]));
            ctx.shell.run_checked(&command, Options::new().quiet())?;
        } else {
            print!("{}", fs::read_to_string(&path)?);
        }
    }
    Ok(())
}

pub(super) fn readme(ctx: &Context, args: &[String]) -> Result<()> {
    show_docs(
        ctx,
        &args[0],
        "README",
        &["README.Debian", "README.Debian.gz", "README", "README.gz", "README.md", "README.md.gz"],
        Path::new(DOC_DIR),
    )
}

pub(super) fn news(ctx: &Context, args: &[String]) -> Result<()> {
    show_docs(
        ctx,
        &args[0],
        "NEWS",
        &["NEWS.Debian.gz", "NEWS.Debian", "NEWS.gz", "NEWS"],
        Path::new(DOC_DIR),
    )
}

fn listscripts_in(ctx: &Context, target: &str, info_dir: &Path) -> Result<()> {
    for script in CONTROL_SCRIPTS {
        let body = if target.ends_with(".deb") {
            let command = format!("dpkg-deb --info {} {script}", quote_all([target]));
            let lines: Vec<String> = ctx.shell.capture(&command, Options::new().quiet())?.collect();
            (!lines.is_empty()).then(|| lines.join("\n") + "\n")
        } else {
            let path = info_dir.join(format!("{target}.{script}"));
            if path.is_file() {
                Some(fs::read_to_string(&path)?)
            } else {
                None
            }
        };

        if let Some(body) = body {
            println!("{}", report::banner(script));
            print!("{body}");
        }
    }
    Ok(())
}

pub(super) fn listscripts(ctx: &Context, args: &[String]) -> Result<()> {
    listscripts_in(ctx, &args[0], Path::new(DPKG_INFO_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::error::JigError;
    use crate::exec::testing::FakeInvoker;
    use tempfile::TempDir;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn describe_rows_dedup_and_truncate() {
        let paragraphs = stanzas(lines(
            "Package: vim\nDescription: Vi IMproved - enhanced vi editor\n\n\
             Package: vim\nDescription: Vi IMproved - enhanced vi editor\n\n\
             Package: emacs\nDescription: GNU Emacs editor (metapackage)\n",
        ));
        let rows = describe_rows(paragraphs, Some(20));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["vim", "Vi IMproved - enh..."]);
        assert_eq!(rows[1][0], "emacs");
    }

    #[test]
    fn describe_sends_debs_to_dpkg_deb() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        describe(&harness.context(&shell), &["tool_1.0_all.deb".to_string()]).unwrap();
        assert_eq!(shell.commands(), vec!["dpkg-deb --info tool_1.0_all.deb"]);
    }

    #[test]
    fn search_rows_split_on_dash() {
        let output = lines("ripgrep - recursively searches directories\nag - fast grep\nnoise\n");
        let rows = search_rows(output.clone(), None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["ag", "fast grep"]);
        assert_eq!(search_rows(output, Some(12))[1][1], "recursive...");
    }

    #[test]
    fn pattern_filter_is_substring() {
        let names = ["libc6", "libssl3", "vim"];
        assert_eq!(matching(names.iter().copied(), Some("lib")), vec!["libc6", "libssl3"]);
        assert_eq!(matching(names.iter().copied(), None).len(), 3);
    }

    #[test]
    fn sections_match_with_or_without_component() {
        let paragraphs: Vec<Stanza> = stanzas(lines(
            "Package: a\nSection: games\n\nPackage: b\nSection: non-free/games\n\nPackage: c\nSection: net\n",
        ))
        .collect();
        let matched: Vec<&str> = paragraphs
            .iter()
            .filter(|s| in_section(s, "games"))
            .filter_map(|s| s.get("Package"))
            .collect();
        assert_eq!(matched, vec!["a", "b"]);
    }

    #[test]
    fn size_rows_sort_and_threshold() {
        let entries = vec![
            SizeEntry { name: "big".into(), size_kb: 250_000, status: "installed".into() },
            SizeEntry { name: "small".into(), size_kb: 12, status: "installed".into() },
            SizeEntry { name: "gone".into(), size_kb: 99_999, status: "config-files".into() },
        ];
        let all = size_rows(entries.clone(), &[], 0);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], vec!["small", "12", "installed"]);
        assert_eq!(all[1], vec!["gone", "99,999", "config-files"]);
        assert_eq!(all[2], vec!["big", "250,000", "installed"]);

        let large = size_rows(entries.clone(), &[], LARGE_KB);
        assert_eq!(large.len(), 2);

        let named = size_rows(entries, &["gone".to_string()], 0);
        assert_eq!(named, vec![vec!["gone", "99,999", "config-files"]]);
    }

    #[test]
    fn log_entries_keep_package_actions() {
        let log = "2024-03-01 10:15:01 startup packages configure\n\
                   2024-03-01 10:15:02 upgrade vim:amd64 2:9.0.1378-2 2:9.1.0016-1\n\
                   2024-03-01 10:15:03 status half-configured vim:amd64 2:9.1.0016-1\n\
                   2024-03-01 10:16:00 remove nano:amd64 7.2-1 <none>\n\
                   2024-03-01 10:17:00 install ripgrep:amd64 <none> 14.1.0-1\n";
        let all = log_entries(log.as_bytes(), None).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].contains("upgrade vim"));

        let vim = log_entries(log.as_bytes(), Some("vim")).unwrap();
        assert_eq!(vim.len(), 1);
    }

    #[test]
    fn listlog_without_log_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        listlog_in(&[], &dir.path().join("dpkg.log")).unwrap();
    }

    #[test]
    fn available_rows_compare_installed_with_archive() {
        let installed: Snapshot = [("vim", "2:9.0.1378-2")].into_iter().collect();
        let archive: Snapshot = [("vim", "2:9.1.0016-1"), ("ripgrep", "14.1.0-1")]
            .into_iter()
            .collect();
        let names = vec!["vim".to_string(), "ripgrep".to_string(), "ghost".to_string()];
        assert_eq!(
            available_rows(&names, &installed, &archive),
            vec![
                vec!["vim", "2:9.0.1378-2", "2:9.1.0016-1"],
                vec!["ripgrep", "N/A", "14.1.0-1"],
                vec!["ghost", "N/A", "N/A"],
            ]
        );
    }

    #[test]
    fn liststatus_reads_status_abbreviations() {
        let harness = Harness::new();
        let shell =
            FakeInvoker::new().with_output(packages::STATUS_QUERY, &["ii  bash", "rc  oldlib"]);
        liststatus(&harness.context(&shell), &["old".to_string()]).unwrap();
        assert_eq!(shell.commands(), vec![packages::STATUS_QUERY]);
    }

    #[test]
    fn extract_unpacks_into_directory() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        extract(&harness.context(&shell), &["tool.deb".to_string(), "out".to_string()]).unwrap();
        assert_eq!(shell.commands(), vec!["dpkg-deb --extract tool.deb out"]);
    }

    #[test]
    fn whichpkg_resolves_bare_commands() {
        let harness = Harness::new();
        let shell = FakeInvoker::new().with_output("command -v", &["/usr/bin/rg"]);
        whichpkg(&harness.context(&shell), &["rg".to_string()]).unwrap();
        assert_eq!(shell.commands(), vec!["command -v rg", "dpkg --search /usr/bin/rg"]);
    }

    #[test]
    fn changelog_falls_back_to_installed_copy() {
        let docs = TempDir::new().unwrap();
        fs::create_dir(docs.path().join("vim")).unwrap();
        fs::write(docs.path().join("vim/changelog.Debian.gz"), b"").unwrap();

        let harness = Harness::new();
        let shell = FakeInvoker::new().with_status("apt-get changelog", 100);
        changelog_in(&harness.context(&shell), "vim", docs.path()).unwrap();

        let commands = shell.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[1].starts_with("zcat "));
        assert!(commands[1].ends_with("vim/changelog.Debian.gz"));
    }

    #[test]
    fn changelog_without_any_copy_fails_with_apt_code() {
        let docs = TempDir::new().unwrap();
        let harness = Harness::new();
        let shell = FakeInvoker::new().with_status("apt-get changelog", 100);
        let err = changelog_in(&harness.context(&shell), "ghost", docs.path()).unwrap_err();
        assert!(matches!(err, JigError::ExternalCommandFailure { code: Some(100), .. }));
    }

    #[test]
    fn listscripts_reads_dpkg_info() {
        let info = TempDir::new().unwrap();
        fs::write(info.path().join("vim.postinst"), "#!/bin/sh\nset -e\n").unwrap();

        let harness = Harness::new();
        let shell = FakeInvoker::new();
        listscripts_in(&harness.context(&shell), "vim", info.path()).unwrap();
        assert!(shell.commands().is_empty());
    }

    #[test]
    fn policy_without_packages_has_no_trailing_space() {
        let harness = Harness::new();
        let shell = FakeInvoker::new();
        policy(&harness.context(&shell), &[]).unwrap();
        assert_eq!(shell.commands(), vec!["apt-cache policy"]);
    }
}
