//! # git-shortcuts
//!
//! Short mnemonic subcommands for everyday git workflows.
//!
//! Each subcommand turns its arguments into the git command lines it stands
//! for (`g c did things -p` becomes
//! `git commit -m "did things" && git push && echo Success!`), optionally
//! consulting and updating a small per-user record of default branches,
//! parent branches and previously checked-out branches.
//!
//! ## Quick Start
//!
//! ```rust
//! use clap::Parser;
//! use git_shortcuts::{BranchConfig, Cli, Platform, Session, SystemRunner};
//!
//! let cli = Cli::try_parse_from(["g", "c", "did", "things", "-p"]).unwrap();
//! let runner = SystemRunner::new();
//! let mut out = Vec::new();
//! let mut session = Session::new(&runner, Platform::Linux, &mut out);
//!
//! let outcome = cli.run(&mut session, &mut BranchConfig::default()).unwrap();
//! assert_eq!(
//!     outcome.executables,
//!     vec![r#"git commit -m "did things" && git push && echo Success!"#]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::cli::{Cli, Outcome, Session};
pub use crate::config::BranchConfig;
pub use crate::error::ShortcutError;
pub use crate::git::{GitRunner, SystemRunner};
pub use crate::platform::{ExecutionFailure, Platform};

/// The current version of git-shortcuts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
