//! Shell aliases for the most common subcommands.

use anyhow::Result;
use clap::Parser;

use super::{Outcome, Session};

/// Alias names and the `g` arguments they expand to, sorted by alias.
pub const ALIASES: &[(&str, &[&str])] = &[
    ("ch", &["ch"]),
    ("cm", &["m"]),
    ("ga", &["a"]),
    ("gb", &["b"]),
    ("gc", &["c"]),
    ("gcnv", &["c", "-n"]),
    ("gcp", &["cp"]),
    ("gd", &["d"]),
    ("gdm", &["d", "-m"]),
    ("gmm", &["mm"]),
    ("gp", &["p"]),
    ("gpl", &["pl"]),
    ("gs", &["s"]),
    ("gua", &["ua"]),
    ("guc", &["uc"]),
    ("guco", &["uco"]),
    ("mm", &["mm"]),
];

/// Aliases command options.
#[derive(Parser)]
pub struct AliasesCommand {}

impl AliasesCommand {
    /// Executes the aliases command.
    pub fn run(&self, session: &mut Session<'_>) -> Result<Outcome> {
        for (alias, args) in ALIASES {
            writeln!(session.out, "alias {alias}='g {}'", args.join(" "))?;
        }
        Ok(Outcome::nothing())
    }
}
