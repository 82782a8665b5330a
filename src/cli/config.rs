//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::{Outcome, Session};
use crate::config::{BranchConfig, FALLBACK_MAIN_BRANCH};
use crate::git::remote_url;

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Default branch configuration.
    Main(MainCommand),
}

/// Default branch operations.
#[derive(Parser)]
pub struct MainCommand {
    /// Default branch subcommand to execute.
    #[command(subcommand)]
    pub command: MainSubcommands,
}

/// Default branch subcommands.
#[derive(Subcommand)]
pub enum MainSubcommands {
    /// Shows the configured default branches.
    Show(ShowCommand),
    /// Sets the default branch for this repository or globally.
    Set(SetCommand),
    /// Removes the default branch for this repository or globally.
    Unset(UnsetCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

/// Set command options.
#[derive(Parser)]
pub struct SetCommand {
    /// Name of the default branch.
    #[arg(value_name = "BRANCH")]
    pub branch: String,

    /// Sets the global default instead of this repository's.
    #[arg(short, long)]
    pub global: bool,
}

/// Unset command options.
#[derive(Parser)]
pub struct UnsetCommand {
    /// Removes the global default instead of this repository's.
    #[arg(short, long)]
    pub global: bool,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        match &self.command {
            ConfigSubcommands::Main(main_cmd) => main_cmd.run(session, config),
        }
    }
}

impl MainCommand {
    /// Executes the default branch command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        match &self.command {
            MainSubcommands::Show(show_cmd) => show_cmd.run(session, config),
            MainSubcommands::Set(set_cmd) => set_cmd.run(session, config),
            MainSubcommands::Unset(unset_cmd) => unset_cmd.run(session, config),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn run(&self, session: &mut Session<'_>, config: &BranchConfig) -> Result<Outcome> {
        if config.default_branch.is_empty() {
            writeln!(
                session.out,
                "No global default branch set; using {FALLBACK_MAIN_BRANCH}"
            )?;
        } else {
            writeln!(session.out, "Global default branch: {}", config.default_branch)?;
        }

        for (repo, branch) in &config.main_branches {
            writeln!(session.out, "{repo}: {branch}")?;
        }
        Ok(Outcome::nothing())
    }
}

impl SetCommand {
    /// Executes the set command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        if self.global {
            writeln!(session.out, "Setting global default branch to {}", self.branch)?;
            config.default_branch.clone_from(&self.branch);
        } else {
            let url = remote_url(session.runner)?;
            writeln!(
                session.out,
                "Setting default branch for {url} to {}",
                self.branch
            )?;
            config.main_branches.insert(url, self.branch.clone());
        }
        Ok(Outcome::nothing().with_changed(true))
    }
}

impl UnsetCommand {
    /// Executes the unset command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        if self.global {
            writeln!(session.out, "Deleting global default branch")?;
            config.default_branch.clear();
            return Ok(Outcome::nothing().with_changed(true));
        }

        let url = remote_url(session.runner)?;
        if config.main_branches.remove(&url).is_some() {
            writeln!(session.out, "Deleting default branch for {url}")?;
            Ok(Outcome::nothing().with_changed(true))
        } else {
            writeln!(session.out, "No default branch set for this repo")?;
            Ok(Outcome::nothing())
        }
    }
}
