//! Shared test utilities.

use std::cell::RefCell;
use std::collections::VecDeque;

use clap::Parser;

use crate::cli::{Cli, Outcome, Session};
use crate::config::BranchConfig;
use crate::error::ShortcutError;
use crate::git::GitRunner;
use crate::platform::Platform;

/// Runner that replays canned output instead of spawning processes.
///
/// Responses are returned in FIFO order; `Err` entries become
/// [`ShortcutError::ShellCommand`]. When the queue is exhausted, further
/// calls fail with `"no more fake responses"`. Every invocation is recorded
/// as `[program, args..]` so tests can assert on the exact queries made.
pub(crate) struct FakeRunner {
    responses: RefCell<VecDeque<Result<Vec<String>, String>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl FakeRunner {
    /// Creates a runner that returns the given responses in order.
    pub(crate) fn new(responses: Vec<Result<Vec<String>, String>>) -> Self {
        Self {
            responses: RefCell::new(VecDeque::from(responses)),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Creates a runner whose responses are all successful stdout lines.
    pub(crate) fn with_stdout(responses: &[&[&str]]) -> Self {
        Self::new(
            responses
                .iter()
                .map(|lines| Ok(lines.iter().map(ToString::to_string).collect()))
                .collect(),
        )
    }

    /// Returns every recorded invocation.
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Returns the number of responses not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }

    /// Builds the recorded form of a `git` invocation.
    pub(crate) fn git_call(args: &[&str]) -> Vec<String> {
        std::iter::once("git")
            .chain(args.iter().copied())
            .map(ToString::to_string)
            .collect()
    }
}

impl GitRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>, ShortcutError> {
        self.calls.borrow_mut().push(
            std::iter::once(program)
                .chain(args.iter().copied())
                .map(ToString::to_string)
                .collect(),
        );

        match self.responses.borrow_mut().pop_front() {
            Some(Ok(lines)) => Ok(lines),
            Some(Err(message)) => Err(ShortcutError::ShellCommand(message)),
            None => Err(ShortcutError::ShellCommand(
                "no more fake responses".to_string(),
            )),
        }
    }
}

/// Parses `args` (without the program name) and runs the command as user
/// `person`, returning the outcome and everything written to the output.
pub(crate) fn run_args(
    args: &[&str],
    runner: &FakeRunner,
    platform: Platform,
    config: &mut BranchConfig,
) -> (anyhow::Result<Outcome>, String) {
    let cli = match Cli::try_parse_from(std::iter::once("g").chain(args.iter().copied())) {
        Ok(cli) => cli,
        Err(e) => panic!("failed to parse {args:?}: {e}"),
    };

    let mut out = Vec::new();
    let result = {
        let mut session =
            Session::new(runner, platform, &mut out).with_user(Some("person".to_string()));
        cli.run(&mut session, config)
    };
    (result, String::from_utf8_lossy(&out).into_owned())
}

/// Runs `args` on linux, expecting success.
pub(crate) fn run_ok(
    args: &[&str],
    runner: &FakeRunner,
    config: &mut BranchConfig,
) -> (Outcome, String) {
    let (result, out) = run_args(args, runner, Platform::Linux, config);
    match result {
        Ok(outcome) => (outcome, out),
        Err(e) => panic!("{args:?} failed: {e:#}"),
    }
}

/// Runs `args` on linux, expecting failure; returns the full error chain.
pub(crate) fn run_err(args: &[&str], runner: &FakeRunner, config: &mut BranchConfig) -> String {
    match run_args(args, runner, Platform::Linux, config).0 {
        Ok(outcome) => panic!("{args:?} unexpectedly succeeded: {outcome:?}"),
        Err(e) => format!("{e:#}"),
    }
}
