//! Error kinds reported by shortcut commands.

use thiserror::Error;

/// Failures detected locally, before any shell command is launched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    /// The origin remote URL is not a recognized GitHub URL.
    #[error("Unknown git url format: {0}")]
    UnknownUrlFormat(String),

    /// Walking the recorded parent branches revisited a branch.
    #[error("cycle detected in parent branches")]
    CycleDetected,

    /// Neither a parent branch nor a per-repository main branch is known.
    #[error("Unknown parent branch for branch {0}; and no default main branch set")]
    NoCompareBase(String),

    /// The branch was never checked out as a new branch from another one.
    #[error("branch {0} does not have a known parent branch")]
    NoParentBranch(String),

    /// No branch was recorded for the repository before the current one.
    #[error("no previous branch exists")]
    NoPreviousBranch,

    /// The platform identity is neither `linux` nor `windows`.
    #[error("Unknown OS ({0:?})")]
    UnknownOs(String),

    /// A git query run through the shell failed.
    #[error("failed to execute shell command: {0}")]
    ShellCommand(String),
}
