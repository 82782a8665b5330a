//! History commands: log, rebase and stash.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::{quote_all, Outcome, Session};

/// Log command options.
#[derive(Parser)]
pub struct LogCommand {
    /// Number of commits.
    #[arg(value_name = "N", default_value_t = 1)]
    pub count: usize,

    /// Shows the combined diff of the last N commits instead of the log.
    #[arg(short, long)]
    pub diff: bool,

    /// Ignores whitespace changes in the diff.
    #[arg(short, long)]
    pub whitespace: bool,
}

impl LogCommand {
    /// Executes the log command.
    pub fn run(&self) -> Result<Outcome> {
        let line = if self.diff {
            let whitespace = if self.whitespace { "-w" } else { "" };
            format!("git diff HEAD~{} {whitespace}", self.count)
        } else {
            format!("git log -n {}", self.count)
        };
        Ok(Outcome::command(line))
    }
}

/// Rebase operations.
#[derive(Parser)]
pub struct RebaseCommand {
    /// Rebase subcommand to execute.
    #[command(subcommand)]
    pub command: RebaseSubcommands,
}

/// Rebase subcommands.
#[derive(Subcommand)]
pub enum RebaseSubcommands {
    /// Aborts the rebase in progress.
    #[command(name = "a")]
    Abort,
    /// Continues the rebase in progress.
    #[command(name = "c")]
    Continue,
}

impl RebaseCommand {
    /// Executes the rebase command.
    pub fn run(&self, session: &mut Session<'_>) -> Result<Outcome> {
        let line = match self.command {
            RebaseSubcommands::Abort => "git rebase --abort",
            RebaseSubcommands::Continue => "git rebase --continue",
        };
        writeln!(session.out, "{line}")?;
        Ok(Outcome::command(line))
    }
}

/// Stash push command options.
#[derive(Parser)]
pub struct StashPushCommand {
    /// Arguments forwarded to `git stash push`.
    #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl StashPushCommand {
    /// Executes the stash push command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!(
            "git stash push {}",
            quote_all(&self.args)
        )))
    }
}

/// Stash pop command options.
#[derive(Parser)]
pub struct StashPopCommand {
    /// Arguments forwarded to `git stash pop`.
    #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl StashPopCommand {
    /// Executes the stash pop command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command(format!(
            "git stash pop {}",
            quote_all(&self.args)
        )))
    }
}
