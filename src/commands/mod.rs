//! Verb dispatch.
//!
//! Every command is a [`CommandSpec`] in the static [`COMMANDS`] table:
//! name, arity contract, usage hint, one-line summary and handler. A verb is
//! resolved by
//! - lowercasing it and dropping `-` and `_` (`List-Installed` == `listinstalled`)
//! - mapping it through [`ALIASES`]
//! - splitting off a `/dist` suffix, which only `install` accepts
//!
//! The arity contract is checked before the handler runs; that is the only
//! argument validation in the tool.

mod install;
mod query;
mod snapshots;
mod system;

pub use system::overview;

use std::path::Path;

use crate::config::Config;
use crate::error::{JigError, Result};
use crate::exec::{quote_all, Invoke};
use crate::platform;
use crate::store::SnapshotStore;

/// What a handler gets to work with.
pub struct Context<'a> {
    pub config: &'a Config,
    pub shell: &'a dyn Invoke,
    pub store: &'a SnapshotStore,
    /// Target release from `install/<dist>`.
    pub dist: Option<String>,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config, shell: &'a dyn Invoke, store: &'a SnapshotStore) -> Self {
        Context {
            config,
            shell,
            store,
            dist: None,
        }
    }
}

pub type Handler = fn(&Context, &[String]) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::AtMost(n) => count <= n,
        }
    }
}

pub struct CommandSpec {
    pub name: &'static str,
    pub arity: Arity,
    /// Completes "<COMMAND> requires ..." when the arity check fails.
    pub usage: &'static str,
    pub synopsis: &'static str,
    pub summary: &'static str,
    /// Listed by plain `jig help`.
    pub common: bool,
    pub handler: Handler,
}

const fn cmd(
    name: &'static str,
    arity: Arity,
    usage: &'static str,
    synopsis: &'static str,
    summary: &'static str,
    handler: Handler,
) -> CommandSpec {
    CommandSpec {
        name,
        arity,
        usage,
        synopsis,
        summary,
        common: false,
        handler,
    }
}

impl CommandSpec {
    const fn common(mut self) -> Self {
        self.common = true;
        self
    }
}

use Arity::{AtLeast, AtMost, Exactly};

const NO_ARGS: &str = "no further arguments";
const PACKAGES: &str = "a list of package names";
const ONE_PACKAGE: &str = "one package name";
const DAEMON: &str = "the name of a daemon";

/// Sorted by name.
pub static COMMANDS: &[CommandSpec] = &[
    cmd("addcdrom", Exactly(0), NO_ARGS, "jig addcdrom", "Add a CD/DVD to the list of available sources", system::addcdrom),
    cmd("addrepo", Exactly(1), "a PPA repository to add", "jig addrepo ppa:<owner>/<name>", "Add a Launchpad PPA repository", system::addrepo),
    cmd("autoalts", Exactly(1), "the name of an alternative", "jig autoalts <alternative>", "Mark the alternative to be auto set (using set priorities)", system::autoalts),
    cmd("autoclean", Exactly(0), NO_ARGS, "jig autoclean", "Remove superseded .deb files from the download cache", install::autoclean),
    cmd("autodownload", Exactly(0), NO_ARGS, "jig autodownload", "Do an update followed by a download of all updated packages", snapshots::autodownload),
    cmd("autoinstall", AtLeast(1), PACKAGES, "jig autoinstall <packages>", "Install without asking questions (non-interactive)", install::autoinstall),
    cmd("autoremove", Exactly(0), NO_ARGS, "jig autoremove", "Remove packages installed automatically as dependencies", install::autoremove),
    cmd("available", AtLeast(1), PACKAGES, "jig available <packages>", "Show installed and archive versions of packages", query::available),
    cmd("build", AtLeast(1), PACKAGES, "jig build <packages>", "Retrieve and unpack sources and build .deb files", install::build),
    cmd("builddeps", AtLeast(1), PACKAGES, "jig builddeps <packages>", "Install packages required to build the listed packages", install::builddeps),
    cmd("changelog", Exactly(1), ONE_PACKAGE, "jig changelog <package>", "Display the Debian changelog of a package", query::changelog),
    cmd("clean", Exactly(0), NO_ARGS, "jig clean", "Remove all .deb files from the download cache", install::clean),
    cmd("commands", Exactly(0), NO_ARGS, "jig commands", "List all commands with a one line description", system::commands),
    cmd("contents", Exactly(1), "a single .deb filename", "jig contents <file.deb>", "List the contents of a package file", query::contents),
    cmd("dailyupgrade", Exactly(0), NO_ARGS, "jig dailyupgrade", "Perform an update then a dist-upgrade", snapshots::dailyupgrade),
    cmd("dependents", Exactly(1), ONE_PACKAGE, "jig dependents <package>", "List packages which depend on, recommend or suggest the package", query::dependents),
    cmd("describe", AtLeast(1), PACKAGES, "jig describe <packages|files>", "One line description of packages (-v for more detail)", query::describe).common(),
    cmd("describenew", Exactly(0), NO_ARGS, "jig describenew", "One line description of new packages", snapshots::describenew),
    cmd("distupgrade", AtMost(1), "at most one target release", "jig distupgrade [release]", "Upgrade to a new distribution", install::distupgrade),
    cmd("download", AtLeast(1), PACKAGES, "jig download <packages>", "Download package files into the current directory", install::download),
    cmd("editsources", Exactly(0), NO_ARGS, "jig editsources", "Edit the list of archives packages are fetched from", system::editsources),
    cmd("extract", Exactly(2), "a .deb file and a target directory", "jig extract <file.deb> <dir>", "Extract the files of a package file into a directory", query::extract),
    cmd("fixconfigure", Exactly(0), NO_ARGS, "jig fixconfigure", "Perform dpkg --configure -a (fix an interrupted configure)", install::fixconfigure),
    cmd("fixinstall", Exactly(0), NO_ARGS, "jig fixinstall", "Perform apt-get --fix-broken install (fix broken dependencies)", install::fixinstall),
    cmd("fixmissing", Exactly(0), NO_ARGS, "jig fixmissing", "Perform apt-get --fix-missing upgrade", install::fixmissing),
    cmd("force", AtLeast(1), "a list of packages or .deb files", "jig force <packages|files>", "Install packages ignoring file overwrites and dependencies", install::force),
    cmd("help", AtLeast(0), "a list of commands", "jig help [commands]", "Print help on individual commands", system::help),
    cmd("hold", AtLeast(1), "a list of packages to place on hold", "jig hold <packages>", "Place packages on hold so they are not upgraded", install::hold),
    cmd("info", Exactly(1), "a single .deb filename", "jig info <file.deb>", "List the control information of a package file", query::info),
    cmd("install", AtLeast(1), "a list of packages, .deb files or one URL", "jig install[/<dist>] <packages|files|url|->", "Install (or upgrade) packages or .deb files", install::install).common(),
    cmd("installfile", Exactly(1), "a file listing packages", "jig installfile <file>", "Install the packages listed in a file", install::installfile),
    cmd("installrecommend", AtLeast(1), PACKAGES, "jig installrecommend <packages>", "Install packages and their recommended packages", install::installrecommend),
    cmd("installsuggest", Exactly(1), ONE_PACKAGE, "jig installsuggest <package>", "Install a package and its suggested packages", install::installsuggest),
    cmd("integrity", Exactly(0), NO_ARGS, "jig integrity", "Check the integrity of installed packages (through checksums)", system::integrity),
    cmd("large", AtMost(0), NO_ARGS, "jig large", "List installed packages larger than 10MB", query::large),
    cmd("lastupdate", Exactly(0), NO_ARGS, "jig lastupdate", "Identify when an update was last performed", snapshots::lastupdate),
    cmd("listalts", Exactly(0), NO_ARGS, "jig listalts", "List the objects that can have alternatives configured", system::listalts),
    cmd("listcache", AtMost(1), "at most one optional pattern", "jig listcache [pattern]", "List the package files in the download cache", install::listcache),
    cmd("listdaemons", Exactly(0), NO_ARGS, "jig listdaemons", "List the daemons that can be started, stopped or reloaded", system::listdaemons),
    cmd("listfiles", Exactly(1), ONE_PACKAGE, "jig listfiles <package>", "List the files supplied by the named package", query::listfiles).common(),
    cmd("listhold", Exactly(0), NO_ARGS, "jig listhold", "List packages on hold", install::listhold),
    cmd("listinstalled", AtMost(1), "at most one optional pattern", "jig listinstalled [pattern]", "List installed packages, optionally matching a pattern", query::listinstalled),
    cmd("listlog", AtMost(1), "at most one optional pattern", "jig listlog [pattern]", "List install, upgrade and removal entries of the dpkg log", query::listlog),
    cmd("listnames", AtMost(1), "at most one optional pattern", "jig listnames [pattern]", "List all known packages or those containing a pattern", query::listnames).common(),
    cmd("listorphans", Exactly(0), NO_ARGS, "jig listorphans", "List libraries not required by any installed package", query::listorphans),
    cmd("listscripts", Exactly(1), "a package name or .deb file", "jig listscripts <package|file.deb>", "List the control scripts of a package", query::listscripts),
    cmd("listsection", Exactly(1), "the name of a section", "jig listsection <section>", "List packages that belong to a section", query::listsection),
    cmd("listsections", Exactly(0), NO_ARGS, "jig listsections", "List the sections that are available", query::listsections),
    cmd("liststatus", AtMost(1), "at most one optional pattern", "jig liststatus [pattern]", "List the dpkg state and name of known packages", query::liststatus),
    cmd("madison", AtLeast(1), PACKAGES, "jig madison <packages>", "Show available versions per archive (apt-cache madison)", query::madison),
    cmd("new", Exactly(0), NO_ARGS, "jig new", "List packages that became available since the last update", snapshots::new).common(),
    cmd("newdetail", Exactly(0), NO_ARGS, "jig newdetail", "Provide a detailed description of new packages", snapshots::newdetail),
    cmd("news", Exactly(1), ONE_PACKAGE, "jig news <package>", "Display the NEWS file of a package", query::news),
    cmd("newupgrades", Exactly(0), NO_ARGS, "jig newupgrades", "List packages newly available for upgrading", snapshots::newupgrades).common(),
    cmd("policy", AtLeast(0), PACKAGES, "jig policy [packages]", "Show priorities and policy of packages or sources", query::policy),
    cmd("purge", AtLeast(1), PACKAGES, "jig purge <packages>", "Remove packages and their configuration files", install::purge),
    cmd("purgeorphans", Exactly(0), NO_ARGS, "jig purgeorphans", "Purge libraries not required by any installed package", install::purgeorphans),
    cmd("purgeremoved", Exactly(0), NO_ARGS, "jig purgeremoved", "Purge configuration files of removed packages", install::purgeremoved),
    cmd("rbuilddeps", Exactly(1), ONE_PACKAGE, "jig rbuilddeps <package>", "List packages which build-depend on the package", query::rbuilddeps),
    cmd("readme", Exactly(1), ONE_PACKAGE, "jig readme <package>", "Display the README file of a package", query::readme),
    cmd("reconfigure", AtLeast(0), "a list of installed packages", "jig reconfigure [packages]", "Reconfigure installed packages (gkdebconf with none)", install::reconfigure),
    cmd("recursive", AtLeast(1), PACKAGES, "jig recursive <packages>", "Download packages and everything they depend on", install::recursive),
    cmd("reinstall", AtLeast(1), PACKAGES, "jig reinstall <packages>", "Reinstall each of the named packages", install::reinstall),
    cmd("reload", Exactly(1), DAEMON, "jig reload <daemon>", "Reload the configuration of a daemon (see listdaemons)", system::reload),
    cmd("remove", AtLeast(1), PACKAGES, "jig remove <packages>", "Remove packages (see also purge)", install::remove).common(),
    cmd("removeorphans", Exactly(0), NO_ARGS, "jig removeorphans", "Remove libraries not required by any installed package", install::removeorphans),
    cmd("repackage", AtLeast(1), PACKAGES, "jig repackage <packages>", "Rebuild .deb files from installed packages", install::repackage),
    cmd("reportbug", Exactly(1), "a single named package", "jig reportbug <package>", "Report a bug using the Debian Bug Tracker", system::reportbug),
    cmd("reset", Exactly(0), NO_ARGS, "jig reset", "Initialise or reset the snapshot files", snapshots::reset),
    cmd("restart", Exactly(1), DAEMON, "jig restart <daemon>", "Stop then start a daemon (see listdaemons)", system::restart),
    cmd("search", AtLeast(1), "a list of words to search for", "jig search <words>", "Search for packages containing the listed words", query::search),
    cmd("show", AtLeast(1), "a list of packages or package files", "jig show <packages>", "Provide a detailed description of packages", query::show),
    cmd("showdistupgrade", Exactly(0), NO_ARGS, "jig showdistupgrade", "Trace the steps a dist-upgrade would perform", install::showdistupgrade),
    cmd("showinstall", AtLeast(1), PACKAGES, "jig showinstall <packages>", "Trace the steps an install would perform", install::showinstall),
    cmd("showremove", AtLeast(1), PACKAGES, "jig showremove <packages>", "Trace the steps a remove would perform", install::showremove),
    cmd("showupgrade", Exactly(0), NO_ARGS, "jig showupgrade", "Trace the steps an upgrade would perform", install::showupgrade),
    cmd("size", AtLeast(0), PACKAGES, "jig size [packages]", "Print the installed size (in KB) of all or the listed packages", query::size),
    cmd("snapshot", Exactly(0), NO_ARGS, "jig snapshot", "List package=version for all installed packages", snapshots::snapshot),
    cmd("source", AtLeast(1), PACKAGES, "jig source <packages>", "Retrieve and unpack sources for the named packages", install::source),
    cmd("start", Exactly(1), DAEMON, "jig start <daemon>", "Start a daemon (see listdaemons)", system::start),
    cmd("status", AtLeast(0), PACKAGES, "jig status [packages]", "Show installed, previous and available versions", snapshots::status),
    cmd("statussearch", Exactly(1), "one pattern to search for", "jig statussearch <pattern>", "Show versions of installed packages matching a pattern", snapshots::statussearch),
    cmd("stop", Exactly(1), DAEMON, "jig stop <daemon>", "Stop a daemon (see listdaemons)", system::stop),
    cmd("toupgrade", Exactly(0), NO_ARGS, "jig toupgrade", "List packages with newer versions available for upgrading", snapshots::toupgrade).common(),
    cmd("unhold", AtLeast(1), "a list of packages to remove from hold", "jig unhold <packages>", "Release packages from hold so they are upgraded again", install::unhold),
    cmd("update", Exactly(0), NO_ARGS, "jig update", "Update the list of downloadable packages", snapshots::update).common(),
    cmd("updatealts", Exactly(1), "the name of an alternative", "jig updatealts <alternative>", "Choose the default for an alternative", system::updatealts),
    cmd("upgrade", Exactly(0), NO_ARGS, "jig upgrade", "Upgrade installed packages without removing or adding any", install::upgrade).common(),
    cmd("version", Exactly(0), NO_ARGS, "jig version", "Show the version of jig", system::version),
    cmd("versions", AtLeast(0), PACKAGES, "jig versions [packages]", "List version and distribution of (all) packages", query::versions),
    cmd("whichpkg", Exactly(1), "a file or command name", "jig whichpkg <file|command>", "Find the package that supplies a file or command", query::whichpkg).common(),
];

/// Alternative spellings, already normalized, mapped to the canonical verb.
pub static ALIASES: &[(&str, &str)] = &[
    ("autoalternatives", "autoalts"),
    ("bug", "reportbug"),
    ("builddep", "builddeps"),
    ("builddepend", "builddeps"),
    ("builddepends", "builddeps"),
    ("detail", "show"),
    ("details", "show"),
    ("detailnew", "newdetail"),
    ("init", "reset"),
    ("installr", "installrecommend"),
    ("installs", "installsuggest"),
    ("listcommands", "commands"),
    ("newdescribe", "describenew"),
    ("orphans", "listorphans"),
    ("rbuilddep", "rbuilddeps"),
    ("recdownload", "recursive"),
    ("reversebuilddeps", "rbuilddeps"),
    ("setup", "editsources"),
    ("sizes", "size"),
    ("whatis", "describe"),
];

pub fn normalize(verb: &str) -> String {
    verb.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|entry| entry.name == name)
}

/// Resolves a verb as typed to its command and optional target release.
pub fn resolve(verb: &str) -> Option<(&'static CommandSpec, Option<String>)> {
    let (verb, dist) = match verb.split_once('/') {
        Some((verb, dist)) => (verb, Some(dist)),
        None => (verb, None),
    };

    let name = normalize(verb);
    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name.as_str());
    let entry = find(name)?;

    match dist {
        None => Some((entry, None)),
        Some(dist) if entry.name == "install" && !dist.is_empty() => Some((entry, Some(dist.to_string()))),
        Some(_) => None,
    }
}

/// Validates `args` against the verb's contract and runs its handler.
pub fn dispatch(ctx: &Context, verb: &str, args: &[String]) -> Result<()> {
    let (entry, dist) = resolve(verb).ok_or_else(|| JigError::UnknownCommand {
        verb: verb.to_string(),
    })?;

    if !entry.arity.accepts(args.len()) {
        return Err(JigError::Arity {
            command: entry.name.to_string(),
            usage: entry.usage.to_string(),
        });
    }

    tracing::debug!(command = entry.name, args = ?args, dist = ?dist, "dispatching");

    let ctx = Context {
        config: ctx.config,
        shell: ctx.shell,
        store: ctx.store,
        dist: dist.or_else(|| ctx.dist.clone()),
    };
    (entry.handler)(&ctx, args)
}

/// Fails with [`JigError::MissingDependency`] unless `path` exists.
pub(crate) fn require_tool(package: &str, path: &str) -> Result<()> {
    let path = Path::new(path);
    if platform::tool_available(path) {
        Ok(())
    } else {
        Err(JigError::MissingDependency {
            package: package.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Joins the non-empty parts of a command line.
pub(crate) fn command_line(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `apt-get <config flags> <options> <action> <quoted packages>`
pub(crate) fn apt_get(config: &Config, options: &[&str], action: &str, packages: &[String]) -> String {
    let flags = config.apt_flags();
    let quoted = quote_all(packages);
    let mut parts = vec!["apt-get"];
    parts.extend(flags.iter().copied());
    parts.extend(options.iter().copied());
    parts.push(action);
    parts.push(&quoted);
    command_line(&parts)
}
