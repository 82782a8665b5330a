//! Running external commands for git queries.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::ShortcutError;

/// Runs an external program and captures its standard output.
///
/// Commands use this to ask git about the repository (current branch, origin
/// URL, status) before deciding what to emit. Tests substitute canned output.
pub trait GitRunner {
    /// Runs `program` with `args`, returning stdout split into lines.
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>, ShortcutError>;

    /// Runs `git` with `args`.
    fn git(&self, args: &[&str]) -> Result<Vec<String>, ShortcutError> {
        self.run("git", args)
    }
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner {
    dir: Option<PathBuf>,
}

impl SystemRunner {
    /// Creates a runner that runs commands in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner that runs commands in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

impl GitRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>, ShortcutError> {
        debug!(program, ?args, dir = ?self.dir, "Running query");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .map_err(|e| ShortcutError::ShellCommand(e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(program, stderr = %stderr.trim_end(), "Query wrote to stderr");
        }
        if !output.status.success() {
            return Err(ShortcutError::ShellCommand(match output.status.code() {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}
