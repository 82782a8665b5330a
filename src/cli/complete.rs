//! Dynamic completion suggestions for file and branch arguments.
//!
//! Shells call `g __complete <COMMAND> [WORDS..]`, where the last word is the
//! one being completed (possibly empty). Suggestions are printed one per line.

use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::debug;

use super::{Outcome, Session};
use crate::git::{git_root, local_branches, status_entries, EntryKind, GitRunner, StatusEntry};

/// Which `git status` entries a command completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSelection {
    /// Files with working tree changes, including untracked ones.
    Worktree,
    /// Files with staged changes.
    Index,
    /// Every changed file.
    Any,
}

impl FileSelection {
    fn includes(self, entry: &StatusEntry) -> bool {
        match self {
            Self::Worktree => entry.has_worktree_changes(),
            Self::Index => entry.is_staged(),
            Self::Any => entry.kind != EntryKind::Ignored,
        }
    }
}

/// Completion command options.
#[derive(Parser)]
pub struct CompleteCommand {
    /// Subcommand whose arguments are being completed.
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Words typed after the subcommand; the last is the partial word.
    #[arg(value_name = "WORDS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub words: Vec<String>,
}

impl CompleteCommand {
    /// Executes the completion command.
    pub fn run(&self, session: &mut Session<'_>) -> Result<Outcome> {
        let (partial, typed) = match self.words.split_last() {
            Some((last, rest)) => (last.as_str(), rest),
            None => ("", &[][..]),
        };

        let runner = session.runner;
        let suggestions = match self.command.as_str() {
            "a" | "rm" | "uc" => file_suggestions(runner, FileSelection::Worktree)?,
            "ua" => file_suggestions(runner, FileSelection::Index)?,
            "s" => file_suggestions(runner, FileSelection::Any)?,
            "d" => {
                let cwd = env::current_dir().context("failed to get current directory")?;
                diff_suggestions(runner, &cwd)?
            }
            "ch" | "bd" => branch_suggestions(runner, session.user.as_deref())?,
            other => {
                debug!(command = other, "No dynamic completions");
                Vec::new()
            }
        };

        let case_insensitive = self.command == "d";
        for suggestion in filter_suggestions(suggestions, typed, partial, case_insensitive) {
            writeln!(session.out, "{suggestion}")?;
        }
        Ok(Outcome::nothing())
    }
}

/// Returns the changed files matching `selection`, sorted and de-duplicated.
pub fn file_suggestions(runner: &dyn GitRunner, selection: FileSelection) -> Result<Vec<String>> {
    let entries = status_entries(runner).context("failed to get git status")?;

    let mut files: Vec<String> = entries
        .into_iter()
        .filter(|entry| selection.includes(entry))
        .map(|entry| entry.path)
        .collect();
    files.sort();
    files.dedup();
    Ok(files)
}

/// Returns the files `git diff` would show, relative to `cwd`.
pub fn diff_suggestions(runner: &dyn GitRunner, cwd: &Path) -> Result<Vec<String>> {
    let root = git_root(runner).context("failed to get git root")?;
    let files = runner
        .git(&["diff", "--name-only"])
        .context("failed to get diffable files")?;

    files
        .iter()
        .filter(|file| !file.is_empty())
        .map(|file| {
            relative_path(&Path::new(&root).join(file), cwd)
                .map(|path| path.to_string_lossy().into_owned())
                .context("failed to get relative path")
        })
        .collect()
}

/// Returns local branches other than the current one.
///
/// Branches named `<user>/x` are also suggested as plain `x`, which `ch`
/// resolves back to the personal branch.
pub fn branch_suggestions(runner: &dyn GitRunner, user: Option<&str>) -> Result<Vec<String>> {
    let branches = local_branches(runner)
        .context("failed to fetch autocomplete suggestions with shell command")?;
    let personal_prefix = user.map(|user| format!("{user}/"));

    let mut names = Vec::new();
    for branch in branches.into_iter().filter(|branch| !branch.current) {
        let stripped = personal_prefix
            .as_deref()
            .and_then(|prefix| branch.name.strip_prefix(prefix))
            .map(str::to_string);
        names.extend(stripped);
        names.push(branch.name);
    }
    names.sort();
    names.dedup();
    Ok(names)
}

/// Drops already typed words and keeps those starting with `partial`.
fn filter_suggestions(
    suggestions: Vec<String>,
    typed: &[String],
    partial: &str,
    case_insensitive: bool,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    suggestions
        .into_iter()
        .filter(|suggestion| !typed.contains(suggestion))
        .filter(|suggestion| {
            if case_insensitive {
                suggestion.to_lowercase().starts_with(&partial_lower)
            } else {
                suggestion.starts_with(partial)
            }
        })
        .collect()
}

/// Expresses absolute `target` relative to absolute `base`, using `..` as needed.
fn relative_path(target: &Path, base: &Path) -> Result<PathBuf> {
    ensure!(
        target.is_absolute() && base.is_absolute(),
        "can't make {} relative to {}",
        target.display(),
        base.display()
    );

    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();
    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Ok(relative)
}
