//! External command execution.
//!
//! Every apt-get, dpkg or helper invocation goes through [`Invoke`]. Command
//! lines are handed to `sh -c` because many of them are pipelines.
//!
//! A non-zero exit is reported as an [`ExitStatus`], not an error: callers
//! branch on it to implement fallbacks. Only failing to start the shell at
//! all is an error. The `_checked` helpers turn a non-zero exit into
//! [`JigError::ExternalCommandFailure`] for callers that have no fallback.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{JigError, Result};
use crate::platform;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Run as root through the configured escalation program.
    pub elevate: bool,
    /// Return stdout as a line stream instead of letting it reach the terminal.
    pub capture: bool,
    /// Never print the command line.
    pub suppress_echo: bool,
    /// Force the C locale for stable sorting and parseable output.
    pub locale_c: bool,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    pub fn root() -> Self {
        Options {
            elevate: true,
            ..Options::default()
        }
    }

    pub fn quiet(mut self) -> Self {
        self.suppress_echo = true;
        self
    }

    pub fn locale_c(mut self) -> Self {
        self.locale_c = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus { code: Some(0) };

    pub fn from_code(code: Option<i32>) -> Self {
        ExitStatus { code }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// None when the process was killed by a signal.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Turns a non-zero status into [`JigError::ExternalCommandFailure`].
    pub fn check(self, command: &str) -> Result<()> {
        if self.success() {
            Ok(())
        } else {
            Err(JigError::ExternalCommandFailure {
                command: command.to_string(),
                code: self.code,
            })
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        ExitStatus { code: status.code() }
    }
}

/// Lazily produced stdout lines, without trailing newlines.
///
/// The exit status is only known once the stream is drained; call
/// [`LineStream::finish`] to get it.
pub struct LineStream {
    source: Source,
}

enum Source {
    Child(ChildLines),
    Memory(std::vec::IntoIter<String>, ExitStatus),
}

impl LineStream {
    /// Lines that are already in memory, from a command that succeeded.
    pub fn new(lines: Vec<String>) -> Self {
        Self::with_status(lines, ExitStatus::SUCCESS)
    }

    pub fn with_status(lines: Vec<String>, status: ExitStatus) -> Self {
        LineStream {
            source: Source::Memory(lines.into_iter(), status),
        }
    }

    /// Discards unread lines, waits for the command and returns its status.
    pub fn finish(self) -> ExitStatus {
        match self.source {
            Source::Child(mut child) => {
                child.by_ref().for_each(drop);
                child.finish()
            }
            Source::Memory(_, status) => status,
        }
    }
}

impl Iterator for LineStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.source {
            Source::Child(child) => child.next(),
            Source::Memory(lines, _) => lines.next(),
        }
    }
}

pub enum Outcome {
    Status(ExitStatus),
    Lines(LineStream),
}

pub trait Invoke {
    fn invoke(&self, command: &str, options: Options) -> Result<Outcome>;

    /// Runs for effect, output going to the terminal.
    fn run(&self, command: &str, options: Options) -> Result<ExitStatus> {
        let options = Options {
            capture: false,
            ..options
        };
        match self.invoke(command, options)? {
            Outcome::Status(status) => Ok(status),
            Outcome::Lines(lines) => Ok(lines.finish()),
        }
    }

    /// Runs and fails with the tool's exit code if it did not succeed.
    fn run_checked(&self, command: &str, options: Options) -> Result<()> {
        self.run(command, options)?.check(command)
    }

    fn capture(&self, command: &str, options: Options) -> Result<LineStream> {
        let options = Options {
            capture: true,
            ..options
        };
        match self.invoke(command, options)? {
            Outcome::Lines(lines) => Ok(lines),
            Outcome::Status(status) => Ok(LineStream::with_status(Vec::new(), status)),
        }
    }

    /// Reads all output, failing with the tool's exit code if it did not
    /// succeed. Partial output from a failed command is never returned.
    fn capture_checked(&self, command: &str, options: Options) -> Result<Vec<String>> {
        let mut stream = self.capture(command, options)?;
        let lines: Vec<String> = stream.by_ref().collect();
        stream.finish().check(command)?;
        Ok(lines)
    }
}

/// Runs commands through `sh -c`, honouring the simulate, teaching and
/// quiet settings.
pub struct ShellInvoker<'a> {
    config: &'a Config,
    is_root: bool,
}

impl<'a> ShellInvoker<'a> {
    pub fn new(config: &'a Config) -> Self {
        ShellInvoker {
            config,
            is_root: platform::is_root(),
        }
    }

    fn needs_elevation(&self, options: &Options) -> bool {
        options.elevate && !self.is_root
    }

    /// The command line as the user would type it.
    pub fn display_line(&self, command: &str, options: &Options) -> String {
        if self.needs_elevation(options) {
            format!("{} {command}", self.config.elevate)
        } else {
            command.to_string()
        }
    }

    fn build(&self, command: &str, options: &Options) -> Result<Command> {
        let mut cmd = if self.needs_elevation(options) {
            let words = shell_words::split(&self.config.elevate).map_err(|e| JigError::Config {
                message: format!("elevate = {:?}: {e}", self.config.elevate),
            })?;
            let (program, args) = words.split_first().ok_or_else(|| JigError::Config {
                message: "elevate must name a program".to_string(),
            })?;
            let mut cmd = Command::new(program);
            cmd.args(args).arg("sh").arg("-c").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };

        if options.locale_c {
            cmd.env("LC_ALL", "C");
        }
        Ok(cmd)
    }
}

impl Invoke for ShellInvoker<'_> {
    fn invoke(&self, command: &str, options: Options) -> Result<Outcome> {
        let line = self.display_line(command, &options);

        if self.config.simulate && !options.capture {
            println!("{line}");
            return Ok(Outcome::Status(ExitStatus::SUCCESS));
        }

        if !options.suppress_echo && (self.config.teaching || self.config.verbosity >= 2) {
            println!("$ {line}");
        }

        debug!(
            command = %line,
            elevate = options.elevate,
            capture = options.capture,
            locale_c = options.locale_c,
            "running external command"
        );

        let mut cmd = self.build(command, &options)?;
        let spawn_failed = |e: std::io::Error| {
            warn!(command = %line, error = %e, "failed to start command");
            JigError::ExternalCommandFailure {
                command: line.clone(),
                code: None,
            }
        };

        if options.capture {
            let mut child = cmd.stdout(Stdio::piped()).spawn().map_err(spawn_failed)?;
            let Some(stdout) = child.stdout.take() else {
                return Err(JigError::ExternalCommandFailure {
                    command: line,
                    code: None,
                });
            };
            return Ok(Outcome::Lines(LineStream {
                source: Source::Child(ChildLines {
                    reader: Some(BufReader::new(stdout)),
                    child: Some(child),
                    status: None,
                    command: line,
                    buf: Vec::new(),
                }),
            }));
        }

        if self.config.quiet {
            cmd.stdout(Stdio::null());
        }
        let status: ExitStatus = cmd.status().map_err(spawn_failed)?.into();
        debug!(command = %line, code = ?status.code(), "command finished");
        Ok(Outcome::Status(status))
    }
}

/// Reads a child's stdout line by line and reaps it once drained or dropped.
struct ChildLines {
    reader: Option<BufReader<ChildStdout>>,
    child: Option<Child>,
    status: Option<ExitStatus>,
    command: String,
    buf: Vec<u8>,
}

impl ChildLines {
    /// Reaps the child once; later calls return the recorded status.
    fn finish(&mut self) -> ExitStatus {
        // closing the pipe first lets a child blocked on write exit
        self.reader = None;
        if let Some(mut child) = self.child.take() {
            let status = match child.wait() {
                Ok(status) => ExitStatus::from(status),
                Err(e) => {
                    warn!(command = %self.command, error = %e, "failed to reap command");
                    ExitStatus::from_code(None)
                }
            };
            if !status.success() {
                debug!(command = %self.command, code = ?status.code(), "captured command exited non-zero");
            }
            self.status = Some(status);
        }
        self.status.unwrap_or(ExitStatus::from_code(None))
    }
}

impl Iterator for ChildLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        self.buf.clear();
        match reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finish();
                None
            }
            Ok(_) => {
                while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                    self.buf.pop();
                }
                Some(String::from_utf8_lossy(&self.buf).into_owned())
            }
            Err(e) => {
                warn!(command = %self.command, error = %e, "failed reading command output");
                self.finish();
                None
            }
        }
    }
}

impl Drop for ChildLines {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Quotes each word for `sh` and joins them with spaces.
pub fn quote_all<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    shell_words::join(words)
}
