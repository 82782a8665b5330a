//! Parsing of `git status --porcelain=v2` output.
//! See <https://git-scm.com/docs/git-status#_porcelain_format_version_2>.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::ShortcutError;
use crate::git::GitRunner;

/// What kind of record a status line describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A tracked path, possibly renamed or copied.
    Tracked,
    /// A path with merge conflicts.
    Unmerged,
    /// A path git does not track.
    Untracked,
    /// A path excluded by ignore rules.
    Ignored,
}

/// One path reported by `git status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Record kind.
    pub kind: EntryKind,
    /// Index status code (`.` when unchanged).
    pub index_status: char,
    /// Working tree status code (`.` when unchanged).
    pub worktree_status: char,
    /// Path relative to the repository root.
    pub path: String,
    /// Source path of a rename or copy.
    pub orig_path: Option<String>,
}

impl StatusEntry {
    /// Whether the path has changes staged in the index.
    pub fn is_staged(&self) -> bool {
        matches!(self.kind, EntryKind::Tracked | EntryKind::Unmerged) && self.index_status != '.'
    }

    /// Whether the path has changes in the working tree that could be added.
    pub fn has_worktree_changes(&self) -> bool {
        match self.kind {
            EntryKind::Untracked => true,
            EntryKind::Tracked | EntryKind::Unmerged => self.worktree_status != '.',
            EntryKind::Ignored => false,
        }
    }

    fn untracked(kind: EntryKind, path: &str) -> Self {
        Self {
            kind,
            index_status: '?',
            worktree_status: '?',
            path: unquote_path(path),
            orig_path: None,
        }
    }
}

#[allow(clippy::expect_used)]
static ORDINARY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^1 ([A-Z.])([A-Z.]) ",     // Prefix and XY status.
        r"[NS][CMU.]{3} ",           // Submodule state.
        r"(?:[0-7]{6} ){3}",         // HEAD, index and worktree modes.
        r"(?:[0-9a-f]+ ){2}",        // HEAD and index object names.
        r"(.+)$",                    // Path.
    ))
    .expect("ordinary porcelain v2 entry regex")
});

#[allow(clippy::expect_used)]
static RENAMED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^2 ([A-Z.])([A-Z.]) ",
        r"[NS][CMU.]{3} ",
        r"(?:[0-7]{6} ){3}",
        r"(?:[0-9a-f]+ ){2}",
        r"[RC][0-9]+ ",              // Rename or copy score.
        r"([^\t]+)\t(.+)$",          // Path and original path.
    ))
    .expect("renamed porcelain v2 entry regex")
});

#[allow(clippy::expect_used)]
static UNMERGED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^u ([A-Z.])([A-Z.]) ",
        r"[NS][CMU.]{3} ",
        r"(?:[0-7]{6} ){4}",         // Stage 1-3 and worktree modes.
        r"(?:[0-9a-f]+ ){3}",        // Stage 1-3 object names.
        r"(.+)$",
    ))
    .expect("unmerged porcelain v2 entry regex")
});

/// Parses one line; headers (`# ...`) and blank lines yield `None`.
pub fn parse_status_line(line: &str) -> Option<StatusEntry> {
    if let Some(path) = line.strip_prefix("? ") {
        return Some(StatusEntry::untracked(EntryKind::Untracked, path));
    }
    if let Some(path) = line.strip_prefix("! ") {
        return Some(StatusEntry::untracked(EntryKind::Ignored, path));
    }
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (kind, captures) = if let Some(captures) = ORDINARY_ENTRY.captures(line) {
        (EntryKind::Tracked, captures)
    } else if let Some(captures) = RENAMED_ENTRY.captures(line) {
        (EntryKind::Tracked, captures)
    } else if let Some(captures) = UNMERGED_ENTRY.captures(line) {
        (EntryKind::Unmerged, captures)
    } else {
        warn!(line, "Unrecognized porcelain v2 status line");
        return None;
    };

    let status_code = |i: usize| {
        captures
            .get(i)
            .and_then(|m| m.as_str().chars().next())
            .unwrap_or('.')
    };

    Some(StatusEntry {
        kind,
        index_status: status_code(1),
        worktree_status: status_code(2),
        path: captures.get(3).map(|m| unquote_path(m.as_str()))?,
        orig_path: captures.get(4).map(|m| unquote_path(m.as_str())),
    })
}

/// Undoes git's C-style quoting of paths with special characters.
///
/// Quoted paths are wrapped in `"` and use backslash escapes, with octal
/// escapes for the bytes of non-ASCII characters. Unquoted paths are returned
/// as-is.
pub fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let Some((&escaped, tail)) = rest.split_first() else {
            bytes.push(byte);
            break;
        };
        rest = tail;
        let decoded = match escaped {
            b'a' => 0x07,
            b'b' => 0x08,
            b't' => b'\t',
            b'n' => b'\n',
            b'v' => 0x0b,
            b'f' => 0x0c,
            b'r' => b'\r',
            b'0'..=b'3' if is_octal_pair(rest) => {
                let value = (escaped - b'0') * 64 + (rest[0] - b'0') * 8 + (rest[1] - b'0');
                rest = &rest[2..];
                value
            }
            other => other,
        };
        bytes.push(decoded);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn is_octal_pair(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2].iter().all(|b| (b'0'..=b'7').contains(b))
}

/// Runs `git status --porcelain=v2` and parses every entry.
pub fn status_entries(runner: &dyn GitRunner) -> Result<Vec<StatusEntry>, ShortcutError> {
    Ok(runner
        .git(&["status", "--porcelain=v2"])?
        .iter()
        .filter_map(|line| parse_status_line(line))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_A: &str = "7efc2d1ea4fa9c61329411bae30090ff3d0cf2be";
    const HASH_B: &str = "e4680edc5a0a0f60ae4e01414f711e6a55a8d8d9";

    #[test]
    fn parses_worktree_modification() {
        let entry =
            parse_status_line(&format!("1 .M N... 100644 100644 100644 {HASH_A} {HASH_A} modified.go"))
                .unwrap();
        assert_eq!(entry.kind, EntryKind::Tracked);
        assert_eq!(entry.path, "modified.go");
        assert!(entry.has_worktree_changes());
        assert!(!entry.is_staged());
    }

    #[test]
    fn parses_staged_modification() {
        let entry = parse_status_line(&format!(
            "1 M. N... 100644 100644 100644 {HASH_A} {HASH_B} modified-cached.go"
        ))
        .unwrap();
        assert!(entry.is_staged());
        assert!(!entry.has_worktree_changes());
    }

    #[test]
    fn keeps_spaces_in_paths() {
        let entry =
            parse_status_line(&format!("1 AM N... 000000 100644 100644 {HASH_A} {HASH_B} dir/a file.go"))
                .unwrap();
        assert_eq!(entry.path, "dir/a file.go");
        assert!(entry.is_staged());
        assert!(entry.has_worktree_changes());
    }

    #[test]
    fn parses_rename_with_original_path() {
        let entry = parse_status_line(&format!(
            "2 R. N... 100644 100644 100644 {HASH_A} {HASH_A} R100 new_file.rs\told_file.rs"
        ))
        .unwrap();
        assert_eq!(entry.path, "new_file.rs");
        assert_eq!(entry.orig_path.as_deref(), Some("old_file.rs"));
        assert!(entry.is_staged());
    }

    #[test]
    fn parses_unmerged_entry() {
        let entry = parse_status_line(&format!(
            "u UU N... 100644 100644 100644 100644 {HASH_A} {HASH_B} {HASH_A} conflicted.rs"
        ))
        .unwrap();
        assert_eq!(entry.kind, EntryKind::Unmerged);
        assert_eq!(entry.path, "conflicted.rs");
        assert!(entry.has_worktree_changes());
    }

    #[test]
    fn parses_untracked_and_ignored() {
        let untracked = parse_status_line("? created.go").unwrap();
        assert_eq!(untracked.kind, EntryKind::Untracked);
        assert!(untracked.has_worktree_changes());
        assert!(!untracked.is_staged());

        let ignored = parse_status_line("! target/").unwrap();
        assert_eq!(ignored.kind, EntryKind::Ignored);
        assert!(!ignored.has_worktree_changes());
    }

    #[test]
    fn unquotes_special_paths() {
        let entry = parse_status_line(&format!(
            r#"1 .M N... 100644 100644 100644 {HASH_A} {HASH_A} "tab\there \"quoted\".go""#
        ))
        .unwrap();
        assert_eq!(entry.path, "tab\there \"quoted\".go");

        let untracked = parse_status_line(r#"? "caf\303\251.txt""#).unwrap();
        assert_eq!(untracked.path, "café.txt");
    }

    #[test]
    fn unquotes_both_sides_of_a_rename() {
        let entry = parse_status_line(&format!(
            "2 R. N... 100644 100644 100644 {HASH_A} {HASH_A} R100 \"new\\\\name.rs\"\t\"old\\nname.rs\""
        ))
        .unwrap();
        assert_eq!(entry.path, r"new\name.rs");
        assert_eq!(entry.orig_path.as_deref(), Some("old\nname.rs"));
    }

    #[test]
    fn plain_paths_are_not_unquoted() {
        assert_eq!(unquote_path("plain.rs"), "plain.rs");
        assert_eq!(unquote_path(r"back\slash"), r"back\slash");
        assert_eq!(unquote_path("\""), "\"");
    }

    #[test]
    fn skips_headers_and_garbage() {
        assert_eq!(parse_status_line("# branch.head main"), None);
        assert_eq!(parse_status_line(""), None);
        assert_eq!(parse_status_line("1 nonsense"), None);
    }
}
