use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{JigError, Result};
use crate::platform;

/// Everything a command handler may consult, built once per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub verbosity: u8,
    pub simulate: bool,
    pub teaching: bool,
    pub quiet: bool,
    pub yes: bool,
    pub noauth: bool,
    pub fast: bool,
    pub recommends: Option<bool>,
    pub json_output: bool,
    /// Program (plus arguments) used to run commands as root.
    pub elevate: String,
    pub state_dir: PathBuf,
    /// Warn when the snapshots are older than this.
    pub stale_after: Option<Duration>,
}

/// Optional settings from ~/.config/jig/config.toml.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub elevate: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub fast: Option<bool>,
    pub recommends: Option<bool>,
    pub stale_after: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| JigError::Config {
            message: e.to_string(),
        })
    }

    /// Reads the file. A missing default file is fine; a missing file the
    /// user named explicitly is not.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map_err(|e| JigError::Config {
                message: format!("{}: {e}", path.display()),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => Ok(FileConfig::default()),
            Err(e) => Err(JigError::Config {
                message: format!("cannot read {}: {e}", path.display()),
            }),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match (&cli.config, platform::default_config_path()) {
            (Some(path), _) => FileConfig::load(path, true)?,
            (None, Some(path)) => FileConfig::load(&path, false)?,
            (None, None) => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Flags win over the file, the file wins over built-in defaults.
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let defaults = Config::default();

        let stale_after = match file.stale_after.as_deref() {
            Some(text) => Some(humantime::parse_duration(text).map_err(|e| JigError::Config {
                message: format!("stale_after = {text:?}: {e}"),
            })?),
            None => defaults.stale_after,
        };

        Ok(Config {
            verbosity: cli.verbose,
            simulate: cli.simulate,
            teaching: cli.teaching,
            quiet: cli.quiet,
            yes: cli.yes,
            noauth: cli.noauth,
            fast: cli.fast || file.fast.unwrap_or(false),
            recommends: cli.recommends_flag().or(file.recommends),
            json_output: cli.json,
            elevate: file.elevate.unwrap_or(defaults.elevate),
            state_dir: file.state_dir.unwrap_or(defaults.state_dir),
            stale_after,
        })
    }

    /// apt-get option flags implied by --yes, --noauth and the recommends setting.
    pub fn apt_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.yes {
            flags.push("--assume-yes");
        }
        if self.noauth {
            flags.push("--allow-unauthenticated");
        }
        match self.recommends {
            Some(true) => flags.push("--install-recommends"),
            Some(false) => flags.push("--no-install-recommends"),
            None => {}
        }
        flags
    }
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = platform::default_state_dir()
            .or_else(|| platform::home_dir().map(|h| h.join(".jig").join(platform::hostname())))
            .unwrap_or_else(|| PathBuf::from(".jig"));

        Config {
            verbosity: 0,
            simulate: false,
            teaching: false,
            quiet: false,
            yes: false,
            noauth: false,
            fast: false,
            recommends: None,
            json_output: false,
            elevate: "sudo".to_string(),
            state_dir,
            stale_after: None,
        }
    }
}
