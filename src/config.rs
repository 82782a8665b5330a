//! Persisted branch bookkeeping.
//!
//! The configuration is loaded once per invocation, mutated in memory by the
//! commands that need it, and written back only when a command reports that
//! it changed something.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ShortcutError;
use crate::utils::settings::{Settings, APP_DIR};

/// Branch used when neither the repository nor the global setting names one.
pub const FALLBACK_MAIN_BRANCH: &str = "main";

/// Settings key overriding the location of the branch configuration file.
pub const CONFIG_PATH_KEY: &str = "GIT_SHORTCUTS_CONFIG";

/// Per-user branch configuration shared by every repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Global default branch, used when a repository has no override.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_branch: String,

    /// Default branch per repository, keyed by the origin remote URL.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub main_branches: BTreeMap<String, String>,

    /// The branch each locally created branch was checked out from.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parent_branches: BTreeMap<String, String>,

    /// The branch checked out before the current one, keyed by repository root.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub previous_branches: BTreeMap<String, String>,
}

impl BranchConfig {
    /// Resolves the main branch for the repository identified by `repo_url`.
    ///
    /// Resolution order: the per-repository entry, then the global default,
    /// then [`FALLBACK_MAIN_BRANCH`].
    pub fn main_branch_for(&self, repo_url: &str) -> &str {
        if let Some(branch) = self.main_branches.get(repo_url) {
            return branch;
        }
        if !self.default_branch.is_empty() {
            return &self.default_branch;
        }
        FALLBACK_MAIN_BRANCH
    }

    /// Records `parent` as the branch `branch` was created from.
    pub fn record_parent(&mut self, branch: &str, parent: &str) {
        self.parent_branches
            .insert(branch.to_string(), parent.to_string());
    }

    /// Forgets the parents of the given branches, returning whether any entry was removed.
    pub fn forget_parents<S: AsRef<str>>(&mut self, branches: &[S]) -> bool {
        let mut removed = false;
        for branch in branches {
            removed |= self.parent_branches.remove(branch.as_ref()).is_some();
        }
        removed
    }

    /// Records `branch` as the last branch checked out in the repository at `root`.
    pub fn record_previous(&mut self, root: &str, branch: &str) {
        self.previous_branches
            .insert(root.to_string(), branch.to_string());
    }

    /// Returns the ancestors of `branch`, oldest first.
    ///
    /// Fails without partial output when the recorded parents form a cycle,
    /// including one that leads back to `branch` itself.
    pub fn ancestors(&self, branch: &str) -> Result<Vec<String>, ShortcutError> {
        let mut visited = HashSet::from([branch]);
        let mut chain = Vec::new();
        let mut current = branch;

        while let Some(parent) = self.parent_branches.get(current) {
            if !visited.insert(parent.as_str()) {
                return Err(ShortcutError::CycleDetected);
            }
            chain.push(parent.clone());
            current = parent.as_str();
        }

        chain.reverse();
        Ok(chain)
    }

    /// Loads the configuration from a specific path; a missing file is an empty configuration.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "No branch configuration file; starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read branch configuration: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse branch configuration: {}", path.display()))
    }

    /// Writes the configuration to `path`, replacing any existing file atomically.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize branch configuration")?;

        let mut file = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        file.write_all(content.as_bytes())
            .context("Failed to write branch configuration")?;
        file.persist(path)
            .with_context(|| format!("Failed to write branch configuration: {}", path.display()))?;

        debug!(path = %path.display(), "Saved branch configuration");
        Ok(())
    }

    /// Returns the configuration path, honouring the `GIT_SHORTCUTS_CONFIG` override.
    pub fn get_config_path(settings: &Settings) -> Result<PathBuf> {
        Self::config_path_from(settings.get_env_var(CONFIG_PATH_KEY))
    }

    /// Returns `override_path` if given, else the file under the home directory.
    fn config_path_from(override_path: Option<String>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(PathBuf::from(path));
        }

        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home_dir.join(APP_DIR).join("branches.json"))
    }
}
