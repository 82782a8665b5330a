//! GitHub remote URLs.

use crate::error::ShortcutError;

const SSH_PREFIX: &str = "git@github.com:";
const HTTPS_PREFIX: &str = "https://github.com/";

/// Extracts `owner/repo` from an SSH or HTTPS GitHub remote URL.
pub fn github_repo_path(url: &str) -> Result<&str, ShortcutError> {
    let path = url
        .strip_prefix(SSH_PREFIX)
        .or_else(|| url.strip_prefix(HTTPS_PREFIX))
        .ok_or_else(|| ShortcutError::UnknownUrlFormat(url.to_string()))?;

    Ok(path.strip_suffix(".git").unwrap_or(path))
}

/// Builds the link that opens a pull request from `branch` into `base`.
pub fn compare_url(url: &str, base: &str, branch: &str) -> Result<String, ShortcutError> {
    let repo = github_repo_path(url)?;
    Ok(format!(
        "https://github.com/{repo}/compare/{base}...{branch}?expand=1"
    ))
}
