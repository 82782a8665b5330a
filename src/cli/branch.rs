//! Branch commands: listing, switching, deleting and lineage.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use super::{quote, quote_all, Outcome, Session};
use crate::config::BranchConfig;
use crate::error::ShortcutError;
use crate::git::{current_branch, git_root, local_branches, remote_url};

/// Branch command options.
#[derive(Parser)]
pub struct BranchCommand {}

impl BranchCommand {
    /// Executes the branch command.
    pub fn run(&self) -> Result<Outcome> {
        Ok(Outcome::command("git branch"))
    }
}

/// Delete branch command options.
#[derive(Parser)]
pub struct DeleteBranchCommand {
    /// Branches to delete.
    #[arg(value_name = "BRANCH", required = true)]
    pub branches: Vec<String>,

    /// Deletes even if the branch is not fully merged.
    #[arg(short, long)]
    pub force: bool,
}

impl DeleteBranchCommand {
    /// Executes the delete branch command.
    pub fn run(&self, config: &mut BranchConfig) -> Result<Outcome> {
        let flag = if self.force { "-D" } else { "-d" };
        let changed = config.forget_parents(&self.branches);

        Ok(
            Outcome::command(format!("git branch {flag} {}", quote_all(&self.branches)))
                .with_changed(changed),
        )
    }
}

/// Checkout command options.
#[derive(Parser)]
pub struct CheckoutCommand {
    /// Branch to check out.
    #[arg(value_name = "BRANCH")]
    pub branch: String,

    /// Creates the branch, recording the current branch as its parent.
    #[arg(short, long)]
    pub new: bool,
}

impl CheckoutCommand {
    /// Executes the checkout command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        let root = git_root(session.runner)?;
        let current = current_branch(session.runner)?;

        let line = if self.new {
            config.record_parent(&self.branch, &current);
            format!("git checkout -b {}", self.branch)
        } else {
            format!("git checkout {}", self.resolve_existing(session)?)
        };
        config.record_previous(&root, &current);

        Ok(Outcome::command(line).with_changed(true))
    }

    /// Prefers `BRANCH` itself, then the user's `<user>/BRANCH`.
    fn resolve_existing(&self, session: &Session<'_>) -> Result<String> {
        let branches = local_branches(session.runner).context("failed to get git branches")?;
        let exists = |name: &str| branches.iter().any(|b| b.name == name);

        if exists(&self.branch) {
            return Ok(self.branch.clone());
        }
        if let Some(user) = &session.user {
            let personal = format!("{user}/{}", self.branch);
            if exists(&personal) {
                debug!(branch = %personal, "Using personal branch");
                return Ok(personal);
            }
        }
        Ok(self.branch.clone())
    }
}

/// Previous branch command options.
#[derive(Parser)]
pub struct PreviousBranchCommand {}

impl PreviousBranchCommand {
    /// Executes the previous branch command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        let root = git_root(session.runner)?;
        let current = current_branch(session.runner)?;

        let previous = config
            .previous_branches
            .get(&root)
            .cloned()
            .ok_or(ShortcutError::NoPreviousBranch)?;
        config.record_previous(&root, &current);

        Ok(Outcome::command(format!("git checkout {previous}")).with_changed(true))
    }
}

/// End branch command options.
#[derive(Parser)]
pub struct EndCommand {}

impl EndCommand {
    /// Executes the end branch command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        let branch = current_branch(session.runner)?;
        let parent = config
            .parent_branches
            .get(&branch)
            .cloned()
            .ok_or_else(|| ShortcutError::NoParentBranch(branch.clone()))?;
        config.forget_parents(&[&branch]);

        let steps = [
            format!("git checkout {parent}"),
            "git pull".to_string(),
            format!("git branch -d {}", quote(&branch)),
        ];
        Ok(Outcome::steps(session.platform, &steps).with_changed(true))
    }
}

/// Main branch command options.
#[derive(Parser)]
pub struct MainCommand {}

impl MainCommand {
    /// Executes the main branch command.
    pub fn run(&self, session: &mut Session<'_>, config: &mut BranchConfig) -> Result<Outcome> {
        let root = git_root(session.runner)?;
        let current = current_branch(session.runner)?;
        let url = remote_url(session.runner)?;

        let line = format!("git checkout {}", config.main_branch_for(&url));
        config.record_previous(&root, &current);
        Ok(Outcome::command(line).with_changed(true))
    }
}

/// Merge main command options.
#[derive(Parser)]
pub struct MergeMainCommand {}

impl MergeMainCommand {
    /// Executes the merge main command.
    pub fn run(&self, session: &Session<'_>, config: &BranchConfig) -> Result<Outcome> {
        let url = remote_url(session.runner)?;
        Ok(Outcome::command(format!(
            "git merge {}",
            config.main_branch_for(&url)
        )))
    }
}

/// Current branch command options.
#[derive(Parser)]
pub struct CurrentCommand {
    /// Format for the current branch; `%s` is replaced by its name.
    #[arg(short = 'f', long, default_value = "%s\n")]
    pub format: String,

    /// Format for each ancestor; when set, the branch lineage is printed oldest first.
    #[arg(short = 'F', long)]
    pub parent_format: Option<String>,

    /// Text printed before everything else.
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Text printed after everything else.
    #[arg(short, long, default_value = "")]
    pub suffix: String,

    /// Prints nothing instead of failing when the current branch is unknown.
    #[arg(short, long)]
    pub ignore_no_branch: bool,
}

impl CurrentCommand {
    /// Executes the current branch command.
    pub fn run(&self, session: &mut Session<'_>, config: &BranchConfig) -> Result<Outcome> {
        let branch = match current_branch(session.runner) {
            Ok(branch) => branch,
            Err(e) if self.ignore_no_branch => {
                debug!(error = %e, "Ignoring unknown current branch");
                return Ok(Outcome::nothing());
            }
            Err(e) => return Err(e.into()),
        };

        let mut text = self.prefix.clone();
        if let Some(parent_format) = &self.parent_format {
            for ancestor in config.ancestors(&branch)? {
                text.push_str(&substitute(parent_format, &ancestor));
            }
        }
        text.push_str(&substitute(&self.format, &branch));
        text.push_str(&self.suffix);

        write!(session.out, "{text}")?;
        Ok(Outcome::nothing())
    }
}

fn substitute(format: &str, branch: &str) -> String {
    format.replace("%s", branch)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::platform::Platform;
    use crate::test_utils::{run_args, run_err, run_ok, FakeRunner};

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn with_parents(pairs: &[(&str, &str)]) -> BranchConfig {
        BranchConfig {
            parent_branches: map(pairs),
            ..BranchConfig::default()
        }
    }

    #[test]
    fn branch_lists_branches() {
        let runner = FakeRunner::new(vec![]);
        let (outcome, _) = run_ok(&["b"], &runner, &mut BranchConfig::default());
        assert_eq!(outcome, Outcome::command("git branch"));
    }

    // --- bd ---

    #[test]
    fn delete_branch_quotes_names() {
        let runner = FakeRunner::new(vec![]);
        let mut config = BranchConfig::default();
        let (outcome, _) = run_ok(&["bd", "tree"], &runner, &mut config);
        assert_eq!(outcome, Outcome::command(r#"git branch -d "tree""#));
        assert_eq!(config, BranchConfig::default());
    }

    #[test]
    fn delete_branches_forgets_their_parents() {
        let runner = FakeRunner::new(vec![]);
        let mut config = with_parents(&[("abc", "def"), ("tree", "root"), ("limb", "leaf")]);
        let (outcome, _) = run_ok(&["bd", "tree", "limb"], &runner, &mut config);
        assert_eq!(
            outcome,
            Outcome::command(r#"git branch -d "tree" "limb""#).with_changed(true)
        );
        assert_eq!(config, with_parents(&[("abc", "def")]));
    }

    #[test]
    fn force_delete_branch() {
        let runner = FakeRunner::new(vec![]);
        let (outcome, _) = run_ok(&["bd", "-f", "tree"], &runner, &mut BranchConfig::default());
        assert_eq!(outcome, Outcome::command(r#"git branch -D "tree""#));
    }

    // --- ch ---

    #[test]
    fn checkout_requires_git_root() {
        let runner = FakeRunner::new(vec![Err("oh no".to_string())]);
        assert_eq!(
            run_err(&["ch", "tree"], &runner, &mut BranchConfig::default()),
            "failed to execute shell command: oh no"
        );
    }

    #[test]
    fn checkout_requires_current_branch() {
        let runner = FakeRunner::new(vec![Ok(vec!["/git/root".to_string()]), Err("whoops".to_string())]);
        assert_eq!(
            run_err(&["ch", "tree"], &runner, &mut BranchConfig::default()),
            "failed to execute shell command: whoops"
        );
    }

    #[test]
    fn checkout_fails_if_branches_cannot_be_listed() {
        let runner = FakeRunner::new(vec![
            Ok(vec!["/git/root".to_string()]),
            Ok(vec!["some-branch".to_string()]),
            Err("whoops".to_string()),
        ]);
        assert_eq!(
            run_err(&["ch", "tree"], &runner, &mut BranchConfig::default()),
            "failed to get git branches: failed to execute shell command: whoops"
        );
    }

    #[test]
    fn checkout_existing_branch_records_previous() {
        let runner = FakeRunner::with_stdout(&[&["/git/root"], &["some-branch"], &["xyz"]]);
        let mut config = BranchConfig::default();
        let (outcome, _) = run_ok(&["ch", "tree"], &runner, &mut config);

        assert_eq!(outcome, Outcome::command("git checkout tree").with_changed(true));
        assert_eq!(config.previous_branches, map(&[("/git/root", "some-branch")]));
        assert!(config.parent_branches.is_empty());
        assert_eq!(
            runner.calls(),
            vec![
                FakeRunner::git_call(&["rev-parse", "--show-toplevel"]),
                FakeRunner::git_call(&["rev-parse", "--abbrev-ref", "HEAD"]),
                FakeRunner::git_call(&["branch", "--list"]),
            ]
        );
    }

    #[test]
    fn checkout_new_branch_records_parent() {
        let runner = FakeRunner::with_stdout(&[&["/git/root"], &["some-branch"]]);
        let mut config = with_parents(&[("tree", "old-branch"), ("other", "other-branch")]);
        let (outcome, _) = run_ok(&["ch", "tree", "-n"], &runner, &mut config);

        assert_eq!(outcome, Outcome::command("git checkout -b tree").with_changed(true));
        assert_eq!(
            config.parent_branches,
            map(&[("tree", "some-branch"), ("other", "other-branch")])
        );
        assert_eq!(config.previous_branches, map(&[("/git/root", "some-branch")]));
    }

    #[test]
    fn checkout_prefers_personal_branch_when_plain_one_is_missing() {
        let runner = FakeRunner::with_stdout(&[
            &["/git/root"],
            &["some-branch"],
            &["limb", "\tperson/tree  ", "person/root", "leaf"],
        ]);
        let (outcome, _) = run_ok(&["ch", "tree"], &runner, &mut BranchConfig::default());
        assert_eq!(outcome.executables, vec!["git checkout person/tree"]);
    }

    #[test]
    fn checkout_uses_plain_branch_when_both_exist() {
        let runner =
            FakeRunner::with_stdout(&[&["/git/root"], &["some-branch"], &["person/tree", " tree\t"]]);
        let (outcome, _) = run_ok(&["ch", "tree"], &runner, &mut BranchConfig::default());
        assert_eq!(outcome.executables, vec!["git checkout tree"]);
    }

    // --- pb ---

    #[test]
    fn previous_branch_fails_without_history() {
        let runner = FakeRunner::with_stdout(&[&["/some/git/root"], &["current-branch"]]);
        assert_eq!(
            run_err(&["pb"], &runner, &mut BranchConfig::default()),
            "no previous branch exists"
        );
    }

    #[test]
    fn previous_branch_swaps_with_current() {
        let runner = FakeRunner::with_stdout(&[&["/some/git/root"], &["current-branch"]]);
        let mut config = BranchConfig {
            previous_branches: map(&[("/some/git/root", "prev-branch"), ("/other", "x")]),
            ..BranchConfig::default()
        };
        let (outcome, _) = run_ok(&["pb"], &runner, &mut config);

        assert_eq!(outcome, Outcome::command("git checkout prev-branch").with_changed(true));
        assert_eq!(
            config.previous_branches,
            map(&[("/some/git/root", "current-branch"), ("/other", "x")])
        );
    }

    // --- end ---

    #[test]
    fn end_requires_parent_branch() {
        let runner = FakeRunner::with_stdout(&[&["tree-branch"]]);
        assert_eq!(
            run_err(&["end"], &runner, &mut BranchConfig::default()),
            "branch tree-branch does not have a known parent branch"
        );
    }

    #[test]
    fn end_returns_to_parent_and_deletes_branch() {
        let runner = FakeRunner::with_stdout(&[&["tree-branch"]]);
        let mut config = with_parents(&[("tree-branch", "trunk"), ("other", "x")]);
        let (outcome, _) = run_ok(&["end"], &runner, &mut config);

        assert_eq!(
            outcome,
            Outcome::command(r#"git checkout trunk && git pull && git branch -d "tree-branch""#)
                .with_changed(true)
        );
        assert_eq!(config, with_parents(&[("other", "x")]));
    }

    #[test]
    fn end_guards_each_step_on_windows() {
        let runner = FakeRunner::with_stdout(&[&["tree-branch"]]);
        let mut config = with_parents(&[("tree-branch", "trunk")]);
        let (result, _) = run_args(&["end"], &runner, Platform::Windows, &mut config);
        assert_eq!(
            result.unwrap().executables,
            vec![
                "git checkout trunk\nif (!$?) { throw \"Command failed: git checkout trunk\" }",
                "git pull\nif (!$?) { throw \"Command failed: git pull\" }",
                "git branch -d \"tree-branch\"\nif (!$?) { throw \"Command failed: git branch -d 'tree-branch'\" }",
            ]
        );
    }

    // --- m / mm ---

    #[test]
    fn main_checks_out_fallback_branch() {
        let runner = FakeRunner::with_stdout(&[&["/git/root"], &["current-branch"], &["test-repo"]]);
        let mut config = BranchConfig::default();
        let (outcome, _) = run_ok(&["m"], &runner, &mut config);

        assert_eq!(outcome, Outcome::command("git checkout main").with_changed(true));
        assert_eq!(config.previous_branches, map(&[("/git/root", "current-branch")]));
        assert_eq!(
            runner.calls()[2],
            FakeRunner::git_call(&["config", "--get", "remote.origin.url"])
        );
    }

    #[test]
    fn main_uses_configured_branch_for_repo() {
        let runner = FakeRunner::with_stdout(&[&["/git/root"], &["current-branch"], &["test-repo"]]);
        let mut config = BranchConfig {
            default_branch: "mainer".to_string(),
            main_branches: map(&[("test-repo", "mainest")]),
            ..BranchConfig::default()
        };
        let (outcome, _) = run_ok(&["m"], &runner, &mut config);
        assert_eq!(outcome.executables, vec!["git checkout mainest"]);
    }

    #[test]
    fn merge_main_uses_global_default_for_unknown_repo() {
        let runner = FakeRunner::with_stdout(&[&["test-repo"]]);
        let mut config = BranchConfig {
            default_branch: "mainer".to_string(),
            main_branches: map(&[("other-repo", "mainest")]),
            ..BranchConfig::default()
        };
        let (outcome, _) = run_ok(&["mm"], &runner, &mut config);
        assert_eq!(outcome, Outcome::command("git merge mainer"));
    }

    // --- current ---

    #[test]
    fn current_fails_when_branch_query_fails() {
        let runner = FakeRunner::new(vec![Err("whoops".to_string())]);
        assert_eq!(
            run_err(&["current"], &runner, &mut BranchConfig::default()),
            "failed to execute shell command: whoops"
        );
    }

    #[test]
    fn current_ignores_failure_when_asked() {
        let runner = FakeRunner::new(vec![Err("whoops".to_string())]);
        let (outcome, out) = run_ok(&["current", "-i"], &runner, &mut BranchConfig::default());
        assert_eq!(outcome, Outcome::nothing());
        assert_eq!(out, "");
    }

    #[test]
    fn current_prints_branch() {
        let runner = FakeRunner::with_stdout(&[&["some-branch"]]);
        let (_, out) = run_ok(&["current"], &runner, &mut BranchConfig::default());
        assert_eq!(out, "some-branch\n");
    }

    #[test]
    fn current_with_custom_format() {
        let runner = FakeRunner::with_stdout(&[&["some-branch"]]);
        let (_, out) = run_ok(
            &["current", "-f", "hello, %s; goodbye"],
            &runner,
            &mut BranchConfig::default(),
        );
        assert_eq!(out, "hello, some-branch; goodbye");
    }

    #[test]
    fn current_with_parent_format_but_no_parent() {
        let runner = FakeRunner::with_stdout(&[&["some-branch"]]);
        let (_, out) = run_ok(&["current", "-F", "%s --> "], &runner, &mut BranchConfig::default());
        assert_eq!(out, "some-branch\n");
    }

    #[test]
    fn current_prints_lineage_with_prefix_and_suffix() {
        let runner = FakeRunner::with_stdout(&[&["some-branch"]]);
        let mut config = with_parents(&[
            ("some-branch", "dad"),
            ("dad", "granddad"),
            ("granddad", "great granddad"),
        ]);
        let (_, out) = run_ok(
            &["current", "-F", "%s --> ", "-p", "((", "-s", "]]"],
            &runner,
            &mut config,
        );
        assert_eq!(out, "((great granddad --> granddad --> dad --> some-branch\n]]");
    }

    #[test]
    fn current_ignores_lineage_without_parent_format() {
        let runner = FakeRunner::with_stdout(&[&["some-branch"]]);
        let mut config = with_parents(&[("some-branch", "dad")]);
        let (_, out) = run_ok(&["current"], &runner, &mut config);
        assert_eq!(out, "some-branch\n");
    }

    #[test]
    fn current_fails_on_cycle_without_output() {
        let runner = FakeRunner::with_stdout(&[&["some-branch"]]);
        let mut config = with_parents(&[
            ("some-branch", "other-branch"),
            ("other-branch", "another-branch"),
            ("another-branch", "other-branch"),
        ]);
        let (result, out) = run_args(
            &["current", "-F", "%s --> "],
            &runner,
            Platform::Linux,
            &mut config,
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "cycle detected in parent branches"
        );
        assert_eq!(out, "");
    }
}
