//! Working tree commands: add, diff, status and undo.

use anyhow::Result;
use clap::Parser;

use super::{Outcome, Session};
use crate::config::BranchConfig;
use crate::git::remote_url;

/// Target of `git diff` when diffing against the previous commit.
const PREVIOUS_COMMIT: &str = "\"$(git rev-parse @~1)\"";

/// Joins files with spaces, or returns `.` when there are none.
fn files_or_all(files: &[String]) -> String {
    if files.is_empty() {
        ".".to_string()
    } else {
        files.join(" ")
    }
}

/// Add command options.
#[derive(Parser)]
pub struct AddCommand {
    /// Files to add; everything when omitted.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// Accepted for symmetry with `d`; has no effect.
    #[arg(short, long)]
    pub whitespace: bool,
}

impl AddCommand {
    /// Executes the add command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!(
            "git add {}",
            files_or_all(&self.files)
        )))
    }
}

/// Diff command options.
#[derive(Parser)]
pub struct DiffCommand {
    /// Files to diff.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// Diffs against the main branch.
    #[arg(short, long, conflicts_with = "commit")]
    pub main: bool,

    /// Diffs against the previous commit.
    #[arg(short, long)]
    pub commit: bool,

    /// Ignores whitespace changes.
    #[arg(short, long)]
    pub whitespace: bool,

    /// Adds the files instead of diffing them.
    #[arg(short, long)]
    pub add: bool,
}

impl DiffCommand {
    /// Executes the diff command.
    pub fn run(&self, session: &Session<'_>, config: &BranchConfig) -> Result<Outcome> {
        if self.add {
            return Ok(Outcome::command(format!(
                "git add {}",
                files_or_all(&self.files)
            )));
        }

        let whitespace = if self.whitespace { "-w" } else { "" };
        let target = if self.main {
            config
                .main_branch_for(&remote_url(session.runner)?)
                .to_string()
        } else if self.commit {
            PREVIOUS_COMMIT.to_string()
        } else {
            "--".to_string()
        };

        Ok(Outcome::command(format!(
            "git diff {whitespace} {target} {}",
            self.files.join(" ")
        )))
    }
}

/// Remove command options.
#[derive(Parser)]
pub struct RemoveCommand {
    /// Files and `rm` flags, passed through unchanged.
    #[arg(
        value_name = "FILES",
        required = true,
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    pub args: Vec<String>,
}

impl RemoveCommand {
    /// Executes the remove command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!("rm {}", self.args.join(" "))))
    }
}

/// Status command options.
#[derive(Parser)]
pub struct StatusCommand {
    /// Files to show.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

impl StatusCommand {
    /// Executes the status command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!("git status {}", self.files.join(" "))))
    }
}

/// Undo add command options.
#[derive(Parser)]
pub struct UndoAddCommand {
    /// Files to unstage; everything when omitted.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

impl UndoAddCommand {
    /// Executes the undo add command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!(
            "git reset -- {}",
            files_or_all(&self.files)
        )))
    }
}

/// Undo change command options.
#[derive(Parser)]
pub struct UndoChangeCommand {
    /// Files whose working tree changes are discarded.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<String>,
}

impl UndoChangeCommand {
    /// Executes the undo change command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!(
            "git checkout -- {}",
            self.files.join(" ")
        )))
    }
}
