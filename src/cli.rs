use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jig")]
#[command(about = "A command-line front end for Debian package management")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (repeat for more detail)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Show the commands that would run without running them
    #[arg(long, short = 's', default_value_t = false)]
    pub simulate: bool,

    /// Show each command before running it
    #[arg(long, short = 't', default_value_t = false)]
    pub teaching: bool,

    /// Run the underlying tools quietly
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,

    /// Assume yes for any questions asked
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,

    /// Allow packages from unauthenticated archives
    #[arg(long, short = 'n', default_value_t = false)]
    pub noauth: bool,

    /// Use apt-cache instead of aptitude for package details
    #[arg(long, short = 'f', default_value_t = false)]
    pub fast: bool,

    /// Install recommended packages too
    #[arg(long, short = 'r', conflicts_with = "no_recommends")]
    pub recommends: bool,

    /// Do not install recommended packages
    #[arg(long, short = 'R')]
    pub no_recommends: bool,

    /// Output tabular listings as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Command to run (try `jig commands`)
    pub command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Recommends preference from the flags, if either was given.
    pub fn recommends_flag(&self) -> Option<bool> {
        if self.recommends {
            Some(true)
        } else if self.no_recommends {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_and_args_are_positional() {
        let cli = Cli::parse_from(["jig", "-vv", "-y", "install", "vim", "-t", "tmux"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.yes);
        assert!(!cli.teaching);
        assert_eq!(cli.command.as_deref(), Some("install"));
        assert_eq!(cli.args, vec!["vim", "-t", "tmux"]);
    }

    #[test]
    fn recommends_flags_conflict() {
        assert!(Cli::try_parse_from(["jig", "-r", "-R", "install", "vim"]).is_err());
        let cli = Cli::parse_from(["jig", "-R", "install", "vim"]);
        assert_eq!(cli.recommends_flag(), Some(false));
    }

    #[test]
    fn no_command_is_allowed() {
        let cli = Cli::parse_from(["jig"]);
        assert!(cli.command.is_none());
        assert!(cli.args.is_empty());
    }
}
