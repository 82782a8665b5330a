//! Commit commands.

use anyhow::Result;
use clap::Parser;

use super::{quote, Outcome, Session};

/// Commit command options.
#[derive(Parser)]
pub struct CommitCommand {
    /// Commit message words, joined with spaces.
    #[arg(value_name = "MESSAGE", required = true)]
    pub message: Vec<String>,

    /// Skips pre-commit checks.
    #[arg(short = 'n', long)]
    pub no_verify: bool,

    /// Pushes after committing.
    #[arg(short, long)]
    pub push: bool,
}

impl CommitCommand {
    /// Executes the commit command.
    pub fn run(&self, session: &Session<'_>) -> Result<Outcome> {
        Ok(Outcome::steps(
            session.platform,
            &commit_steps(&self.message, self.no_verify, self.push),
        ))
    }
}

/// Commit and push command options.
#[derive(Parser)]
pub struct CommitPushCommand {
    /// Commit message words, joined with spaces.
    #[arg(value_name = "MESSAGE", required = true)]
    pub message: Vec<String>,

    /// Skips pre-commit checks.
    #[arg(short = 'n', long)]
    pub no_verify: bool,
}

impl CommitPushCommand {
    /// Executes the commit and push command.
    pub fn run(&self, session: &Session<'_>) -> Result<Outcome> {
        Ok(Outcome::steps(
            session.platform,
            &commit_steps(&self.message, self.no_verify, true),
        ))
    }
}

fn commit_steps(message: &[String], no_verify: bool, push: bool) -> Vec<String> {
    let verify = if no_verify { "--no-verify " } else { "" };
    let mut steps = vec![format!(
        "git commit {verify}-m {}",
        quote(&message.join(" "))
    )];
    if push {
        steps.push("git push".to_string());
    }
    steps.push("echo Success!".to_string());
    steps
}

/// Amend command options.
#[derive(Parser)]
pub struct AmendCommand {}

impl AmendCommand {
    /// Executes the amend command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command("git commit --amend --no-edit"))
    }
}

/// Undo commit command options.
#[derive(Parser)]
pub struct UndoCommitCommand {}

impl UndoCommitCommand {
    /// Executes the undo commit command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command("git reset HEAD~"))
    }
}
