//! CLI interface for git-shortcuts.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::BranchConfig;
use crate::git::{GitRunner, SystemRunner};
use crate::platform::{self, Platform};
use crate::utils::Settings;

pub mod aliases;
pub mod branch;
pub mod commit;
pub mod complete;
pub mod config;
pub mod files;
pub mod history;
pub mod remote;

/// g: short mnemonic subcommands for everyday git workflows.
#[derive(Parser)]
#[command(name = "g")]
#[command(about = "Short mnemonic subcommands for everyday git workflows", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Prints the shell commands instead of running them.
    #[arg(short = 'y', long, global = true)]
    pub dry_run: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Every subcommand, keyed by its short name.
#[derive(Subcommand)]
pub enum Commands {
    /// Adds files to the index.
    #[command(name = "a")]
    Add(files::AddCommand),
    /// Amends the last commit without editing its message.
    #[command(name = "am")]
    Amend(commit::AmendCommand),
    /// Lists branches.
    #[command(name = "b")]
    Branch(branch::BranchCommand),
    /// Deletes branches.
    #[command(name = "bd")]
    DeleteBranch(branch::DeleteBranchCommand),
    /// Commits staged changes.
    #[command(name = "c")]
    Commit(commit::CommitCommand),
    /// Commits staged changes and pushes.
    #[command(name = "cp")]
    CommitPush(commit::CommitPushCommand),
    /// Manages the stored branch configuration.
    #[command(name = "cfg")]
    Config(config::ConfigCommand),
    /// Checks out an existing or new branch.
    #[command(name = "ch")]
    Checkout(branch::CheckoutCommand),
    /// Prints the current branch, optionally with its lineage.
    #[command(name = "current")]
    Current(branch::CurrentCommand),
    /// Diffs changes.
    #[command(name = "d")]
    Diff(files::DiffCommand),
    /// Returns to the parent branch and deletes the current one.
    #[command(name = "end")]
    End(branch::EndCommand),
    /// Fetches from the remote.
    #[command(name = "f")]
    Fetch(remote::FetchCommand),
    /// Pulls from the remote.
    #[command(name = "l", visible_alias = "pl")]
    Pull(remote::PullCommand),
    /// Shows recent commits or their diff.
    #[command(name = "lg")]
    Log(history::LogCommand),
    /// Checks out the main branch.
    #[command(name = "m")]
    Main(branch::MainCommand),
    /// Merges the main branch into the current branch.
    #[command(name = "mm")]
    MergeMain(branch::MergeMainCommand),
    /// Pops the stash.
    #[command(name = "op")]
    StashPop(history::StashPopCommand),
    /// Pushes onto the stash.
    #[command(name = "ush")]
    StashPush(history::StashPushCommand),
    /// Pushes to the remote.
    #[command(name = "p")]
    Push(remote::PushCommand),
    /// Checks out the previously checked-out branch.
    #[command(name = "pb")]
    PreviousBranch(branch::PreviousBranchCommand),
    /// Pulls then pushes.
    #[command(name = "pp")]
    PullPush(remote::PullPushCommand),
    /// Prints the link for opening a pull request from the current branch.
    #[command(name = "pr-link")]
    PrLink(remote::PrLinkCommand),
    /// Aborts or continues a rebase.
    #[command(name = "rb")]
    Rebase(history::RebaseCommand),
    /// Removes files.
    #[command(name = "rm")]
    Remove(files::RemoveCommand),
    /// Shows the working tree status.
    #[command(name = "s")]
    Status(files::StatusCommand),
    /// Unstages files.
    #[command(name = "ua")]
    UndoAdd(files::UndoAddCommand),
    /// Discards working tree changes.
    #[command(name = "uc")]
    UndoChange(files::UndoChangeCommand),
    /// Undoes the last commit, keeping its changes.
    #[command(name = "uco")]
    UndoCommit(commit::UndoCommitCommand),
    /// Pushes with upstream tracking and prints the pull request link.
    #[command(name = "up")]
    Upstream(remote::UpstreamCommand),
    /// Prints shell aliases for the most common subcommands.
    Aliases(aliases::AliasesCommand),
    /// Prints completion suggestions for a subcommand.
    #[command(name = "__complete", hide = true)]
    Complete(complete::CompleteCommand),
}

/// Everything a command needs from its environment.
pub struct Session<'a> {
    /// Runs git queries.
    pub runner: &'a dyn GitRunner,
    /// Shell flavour executables are written for.
    pub platform: Platform,
    /// User name scoping personal branches.
    pub user: Option<String>,
    /// Whether commands must avoid side effects beyond printing.
    pub dry_run: bool,
    /// Destination for direct output (links, configuration, completions).
    pub out: &'a mut dyn Write,
}

impl<'a> Session<'a> {
    /// Creates a session without a user name.
    pub fn new(runner: &'a dyn GitRunner, platform: Platform, out: &'a mut dyn Write) -> Self {
        Self {
            runner,
            platform,
            user: None,
            dry_run: false,
            out,
        }
    }

    /// Sets the user name.
    #[must_use]
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }
}

/// The result of running a command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Shell command lines to execute, in order.
    pub executables: Vec<String>,
    /// Whether the branch configuration was modified and needs saving.
    pub changed: bool,
}

impl Outcome {
    /// An outcome with nothing to execute.
    pub fn nothing() -> Self {
        Self::default()
    }

    /// An outcome executing a single command line.
    pub fn command(line: impl Into<String>) -> Self {
        Self {
            executables: vec![line.into()],
            changed: false,
        }
    }

    /// An outcome executing ordered steps, joined for `platform`.
    pub fn steps<S: AsRef<str>>(platform: Platform, steps: &[S]) -> Self {
        Self {
            executables: platform.join(steps),
            changed: false,
        }
    }

    /// Marks whether the branch configuration changed.
    #[must_use]
    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let platform = Platform::detect(&settings)?;
        let config_path = BranchConfig::get_config_path(&settings)?;

        let runner = SystemRunner::new();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut session =
            Session::new(&runner, platform, &mut out).with_user(settings.user_name());

        self.execute_with(&mut session, &config_path)
    }

    /// Runs the command with the branch configuration stored at `config_path`.
    ///
    /// The configuration is saved only when the command changed it and this
    /// is not a dry run. A dry run prints the executables instead of running
    /// them.
    pub fn execute_with(&self, session: &mut Session<'_>, config_path: &Path) -> Result<()> {
        let mut config = BranchConfig::load_from_path(config_path)?;
        let outcome = self.run(session, &mut config)?;

        if session.dry_run {
            write!(
                session.out,
                "{}",
                platform::dry_run_summary(&outcome.executables)
            )?;
            return Ok(());
        }

        if outcome.changed {
            config.save_to_path(config_path)?;
        }

        session.out.flush().context("Failed to flush output")?;
        platform::execute(session.platform, &outcome.executables)
    }

    /// Runs the command against an explicit session and configuration.
    ///
    /// Nothing is persisted and no executable runs here; the caller decides
    /// what to do with the returned [`Outcome`]. Outside a dry run, `up`
    /// pushes through the session's runner.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        session.dry_run |= self.dry_run;
        debug!(platform = %session.platform, dry_run = session.dry_run, "Dispatching command");

        match &self.command {
            Commands::Add(cmd) => cmd.run(),
            Commands::Amend(cmd) => cmd.run(),
            Commands::Branch(cmd) => cmd.run(),
            Commands::DeleteBranch(cmd) => cmd.run(config),
            Commands::Commit(cmd) => cmd.run(session),
            Commands::CommitPush(cmd) => cmd.run(session),
            Commands::Config(cmd) => cmd.run(session, config),
            Commands::Checkout(cmd) => cmd.run(session, config),
            Commands::Current(cmd) => cmd.run(session, config),
            Commands::Diff(cmd) => cmd.run(session, config),
            Commands::End(cmd) => cmd.run(session, config),
            Commands::Fetch(cmd) => cmd.run(),
            Commands::Pull(cmd) => cmd.run(),
            Commands::Log(cmd) => cmd.run(),
            Commands::Main(cmd) => cmd.run(session, config),
            Commands::MergeMain(cmd) => cmd.run(session, config),
            Commands::StashPop(cmd) => cmd.run(),
            Commands::StashPush(cmd) => cmd.run(),
            Commands::Push(cmd) => cmd.run(session),
            Commands::PreviousBranch(cmd) => cmd.run(session, config),
            Commands::PullPush(cmd) => cmd.run(session),
            Commands::PrLink(cmd) => cmd.run(session, config),
            Commands::Rebase(cmd) => cmd.run(session),
            Commands::Remove(cmd) => cmd.run(),
            Commands::Status(cmd) => cmd.run(),
            Commands::UndoAdd(cmd) => cmd.run(),
            Commands::UndoChange(cmd) => cmd.run(),
            Commands::UndoCommit(cmd) => cmd.run(),
            Commands::Upstream(cmd) => cmd.run(session, config),
            Commands::Aliases(cmd) => cmd.run(session),
            Commands::Complete(cmd) => cmd.run(session),
        }
    }
}

/// Wraps `value` in double quotes, escaping embedded quotes and backslashes.
///
/// Newlines are kept as-is so multi-line commit messages survive.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Quotes every value and joins them with spaces.
pub(crate) fn quote_all<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|value| quote(value.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
