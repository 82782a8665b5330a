//! Repository facts read through git before a command is built.

use crate::error::ShortcutError;
use crate::git::GitRunner;

/// Returns the name of the checked-out branch.
pub fn current_branch(runner: &dyn GitRunner) -> Result<String, ShortcutError> {
    first_line(runner.git(&["rev-parse", "--abbrev-ref", "HEAD"])?)
}

/// Returns the absolute path of the repository's top-level directory.
pub fn git_root(runner: &dyn GitRunner) -> Result<String, ShortcutError> {
    first_line(runner.git(&["rev-parse", "--show-toplevel"])?)
}

/// Returns the URL of the `origin` remote, which identifies the repository.
pub fn remote_url(runner: &dyn GitRunner) -> Result<String, ShortcutError> {
    first_line(runner.git(&["config", "--get", "remote.origin.url"])?)
}

/// A line of `git branch --list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedBranch {
    /// Branch name with surrounding whitespace removed.
    pub name: String,
    /// Whether this is the checked-out branch (marked with `*`).
    pub current: bool,
}

/// Lists local branches.
pub fn local_branches(runner: &dyn GitRunner) -> Result<Vec<ListedBranch>, ShortcutError> {
    Ok(parse_branch_list(&runner.git(&["branch", "--list"])?))
}

/// Parses `git branch --list` output, skipping blank lines.
pub fn parse_branch_list<S: AsRef<str>>(lines: &[S]) -> Vec<ListedBranch> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            let (name, current) = match line.strip_prefix('*') {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            (!name.is_empty()).then(|| ListedBranch {
                name: name.to_string(),
                current,
            })
        })
        .collect()
}

fn first_line(lines: Vec<String>) -> Result<String, ShortcutError> {
    Ok(lines
        .into_iter()
        .next()
        .map(|line| line.trim().to_string())
        .unwrap_or_default())
}
