//! Error taxonomy.
//!
//! Every failure a command can hit ends up as a [`JigError`]. None of them are
//! retried: `main` prints the message and exits with [`JigError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum JigError {
    /// Wrong number of arguments for a command.
    #[error("{} requires {usage}", command.to_uppercase())]
    Arity { command: String, usage: String },

    /// Verb not found after normalization and alias resolution.
    #[error("{} is not a jig command", verb.to_uppercase())]
    UnknownCommand { verb: String },

    /// A helper binary the command needs is not installed.
    #[error("This command depends on \"{package}\" being installed ({} not found).", path.display())]
    MissingDependency { package: String, path: PathBuf },

    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The wrapped tool returned non-zero, or could not be started at all.
    #[error("command failed{}: {command}", code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    ExternalCommandFailure { command: String, code: Option<i32> },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JigError {
    /// Process exit status for this error.
    ///
    /// External failures pass the wrapped tool's own code through so scripts
    /// see what apt-get or dpkg reported.
    pub fn exit_code(&self) -> i32 {
        match self {
            JigError::ExternalCommandFailure { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, JigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_failure_keeps_tool_exit_code() {
        let err = JigError::ExternalCommandFailure {
            command: "apt-get install foo".to_string(),
            code: Some(100),
        };
        assert_eq!(err.exit_code(), 100);
        assert_eq!(err.to_string(), "command failed with exit code 100: apt-get install foo");
    }

    #[test]
    fn spawn_failure_exits_one() {
        let err = JigError::ExternalCommandFailure {
            command: "sh".to_string(),
            code: None,
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn arity_message_names_command() {
        let err = JigError::Arity {
            command: "changelog".to_string(),
            usage: "one package name".to_string(),
        };
        assert_eq!(err.to_string(), "CHANGELOG requires one package name");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unknown_command_message() {
        let err = JigError::UnknownCommand {
            verb: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "FROBNICATE is not a jig command");
    }
}
