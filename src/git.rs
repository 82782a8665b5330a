//! Git queries and output parsing.

pub mod query;
pub mod remote;
pub mod runner;
pub mod status;

pub use query::{current_branch, git_root, local_branches, remote_url, ListedBranch};
pub use remote::{compare_url, github_repo_path};
pub use runner::{GitRunner, SystemRunner};
pub use status::{status_entries, EntryKind, StatusEntry};
