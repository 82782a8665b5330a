//! Platform-specific shell handling.
//!
//! Commands are built as ordered steps. On linux the steps are chained with
//! `&&` into one command line; PowerShell has no equivalent short-circuit, so
//! on windows every step becomes its own command followed by an exit-status
//! guard.

use std::fmt;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

use crate::error::ShortcutError;
use crate::utils::Settings;

/// Settings key overriding the detected platform.
pub const PLATFORM_KEY: &str = "GIT_SHORTCUTS_OS";

/// The shell flavour emitted commands are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// POSIX `sh`.
    Linux,
    /// PowerShell.
    Windows,
}

impl Platform {
    /// Parses a platform identity.
    pub fn from_name(name: &str) -> Result<Self, ShortcutError> {
        match name {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            other => Err(ShortcutError::UnknownOs(other.to_string())),
        }
    }

    /// Returns the platform from settings, falling back to the compile target.
    pub fn detect(settings: &Settings) -> Result<Self, ShortcutError> {
        Self::from_override(settings.get_env_var(PLATFORM_KEY).as_deref())
    }

    fn from_override(name: Option<&str>) -> Result<Self, ShortcutError> {
        match name {
            Some(name) => Self::from_name(name),
            None if cfg!(windows) => Ok(Self::Windows),
            None => Ok(Self::Linux),
        }
    }

    /// Returns the platform identity.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Converts ordered steps into the command lines to execute.
    pub fn join<S: AsRef<str>>(self, steps: &[S]) -> Vec<String> {
        match self {
            Self::Linux => vec![steps
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" && ")],
            Self::Windows => steps
                .iter()
                .map(|step| windows_step(step.as_ref()))
                .collect(),
        }
    }

    /// Builds the process that runs one command line.
    fn shell_command(self, command_line: &str) -> Command {
        match self {
            Self::Linux => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(command_line);
                cmd
            }
            Self::Windows => {
                let mut cmd = Command::new("powershell");
                cmd.args(["-NoProfile", "-Command", command_line]);
                cmd
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Appends a guard that aborts when `step` fails; quotes are normalized so the
/// step text stays valid inside the thrown message.
fn windows_step(step: &str) -> String {
    format!(
        "{step}\nif (!$?) {{ throw \"Command failed: {}\" }}",
        step.replace('"', "'")
    )
}

/// A shell command line that exited unsuccessfully.
#[derive(Debug)]
pub struct ExecutionFailure {
    /// The command line that failed.
    pub command_line: String,
    /// Exit code of the shell, if it exited normally.
    pub code: Option<i32>,
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "command exited with status {code}: {}", self.command_line),
            None => write!(f, "command terminated by signal: {}", self.command_line),
        }
    }
}

impl std::error::Error for ExecutionFailure {}

/// Runs command lines one after another through the platform shell,
/// stopping at the first failure.
pub fn execute(platform: Platform, executables: &[String]) -> Result<()> {
    for command_line in executables.iter().filter(|line| !line.is_empty()) {
        info!(platform = %platform, command = %command_line, "Running shell command");

        let status = platform
            .shell_command(command_line)
            .status()
            .with_context(|| format!("Failed to launch shell for: {command_line}"))?;

        if !status.success() {
            return Err(ExecutionFailure {
                command_line: command_line.clone(),
                code: status.code(),
            }
            .into());
        }
    }
    Ok(())
}

/// Renders the executables for `--dry-run`.
pub fn dry_run_summary(executables: &[String]) -> String {
    let mut summary = String::from("# Dry Run Summary\n# Shell executables:\n");
    for command_line in executables {
        summary.push_str(command_line);
        summary.push('\n');
    }
    summary
}
