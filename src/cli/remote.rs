//! Remote commands: fetch, pull, push and pull request links.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use super::{quote, Outcome, Session};
use crate::config::BranchConfig;
use crate::error::ShortcutError;
use crate::git::{compare_url, current_branch, github_repo_path, remote_url};

/// Fetch command options.
#[derive(Parser)]
pub struct FetchCommand {}

impl FetchCommand {
    /// Executes the fetch command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command("git fetch"))
    }
}

/// Pull command options.
#[derive(Parser)]
pub struct PullCommand {}

impl PullCommand {
    /// Executes the pull command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command("git pull"))
    }
}

/// Push command options.
#[derive(Parser)]
pub struct PushCommand {
    /// Sets the upstream of the current branch to `origin`.
    #[arg(short, long)]
    pub upstream: bool,
}

impl PushCommand {
    /// Executes the push command.
    pub fn run(&self, session: &mut Session<'_>) -> Result<Outcome> {
        if !self.upstream {
            return Ok(Outcome::command("git push"));
        }
        let branch = current_branch(session.runner)?;
        let line = push_upstream_line(&branch);
        writeln!(session.out, "{line}")?;
        Ok(Outcome::command(line))
    }
}

/// Pull and push command options.
#[derive(Parser)]
pub struct PullPushCommand {}

impl PullPushCommand {
    /// Executes the pull and push command.
    pub fn run(&self, session: &Session<'_>) -> Result<Outcome> {
        Ok(Outcome::steps(session.platform, &["git pull", "git push"]))
    }
}

/// Pull request link command options.
#[derive(Parser)]
pub struct PrLinkCommand {}

impl PrLinkCommand {
    /// Executes the pull request link command.
    pub fn run(&self, session: &mut Session<'_>, config: &BranchConfig) -> Result<Outcome> {
        let branch = current_branch(session.runner)?;
        let url = remote_url(session.runner)?;

        let link = pr_link(config, &url, &branch)?;
        writeln!(session.out, "{link}")?;
        Ok(Outcome::nothing())
    }
}

/// Upstream push command options.
#[derive(Parser)]
pub struct UpstreamCommand {}

impl UpstreamCommand {
    /// Executes the upstream push command.
    pub fn run(&self, session: &mut Session<'_>, config: &BranchConfig) -> Result<Outcome> {
        let branch = current_branch(session.runner)?;
        let url = remote_url(session.runner)?;

        let outcome = if session.dry_run {
            Outcome::command(push_upstream_line(&branch))
        } else {
            info!(branch = %branch, "Pushing with upstream tracking");
            session
                .runner
                .git(&["push", "--set-upstream", "origin", &branch])
                .context("failed to run git push")?;
            Outcome::nothing()
        };

        let link = pr_link(config, &url, &branch)?;
        writeln!(session.out, "{link}")?;
        Ok(outcome)
    }
}

fn push_upstream_line(branch: &str) -> String {
    format!("git push --set-upstream origin {}", quote(branch))
}

/// Builds the compare link for `branch`.
///
/// The base is the recorded parent of `branch`, then the repository's
/// configured main branch; the global default is not consulted.
fn pr_link(config: &BranchConfig, url: &str, branch: &str) -> Result<String, ShortcutError> {
    github_repo_path(url)?;

    let base = config
        .parent_branches
        .get(branch)
        .or_else(|| config.main_branches.get(url))
        .ok_or_else(|| ShortcutError::NoCompareBase(branch.to_string()))?;

    compare_url(url, base, branch)
}
