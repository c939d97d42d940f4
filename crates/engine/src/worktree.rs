// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worktree policy on top of the git adapter.
//!
//! Worktrees isolate concurrent agents: each gets its own checkout under
//! `{repo-root}/{base-dir}/{name}`. Name collisions on disk are resolved
//! with a Unix-epoch suffix; branch collisions fall back through checkout →
//! new branch → uniquified branch name.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use vf_adapters::{GitAdapter, GitError, Worktree};

#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error("worktree io: {0}")]
    Io(#[from] std::io::Error),
}

/// Creates, looks up, and removes worktrees for one repository.
#[derive(Debug, Clone)]
pub struct WorktreeManager {
    repo_root: PathBuf,
    base_dir: String,
    git: GitAdapter,
}

impl WorktreeManager {
    /// Build a manager rooted at the repository containing `dir`.
    /// `base_dir` is relative to the repo root (e.g. ".claude/worktrees").
    /// Fails when `dir` is not inside a git repository.
    pub async fn new(dir: &Path, base_dir: &str) -> Result<Self, WorktreeError> {
        let git = GitAdapter::new();
        let mut repo_root = git.repo_root(dir).await?;
        // Inside a linked worktree, --show-toplevel reports the worktree
        // itself. Porcelain lists the main worktree first; anchor there so
        // removal keeps working when invoked from within a worktree.
        if let Ok(worktrees) = git.worktree_list(&repo_root).await {
            if let Some(main) = worktrees.first() {
                repo_root = main.path.clone();
            }
        }
        Ok(Self {
            repo_root,
            base_dir: base_dir.to_string(),
            git,
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Create a worktree under the configured base directory.
    ///
    /// With `new_branch` the branch is created explicitly and the call
    /// fails if it already exists. Otherwise an existing branch is checked
    /// out, falling back to creating the branch, and as a last resort a
    /// uniquified `{branch}-wt-{epoch}` branch.
    pub async fn create(
        &self,
        name: &str,
        branch: &str,
        new_branch: bool,
    ) -> Result<PathBuf, WorktreeError> {
        let base = self.repo_root.join(&self.base_dir);
        self.create_in(&base, name, branch, new_branch).await
    }

    /// Same as [`create`], but under a caller-supplied base directory.
    ///
    /// [`create`]: WorktreeManager::create
    pub async fn create_in_dir(
        &self,
        custom_dir: &Path,
        name: &str,
        branch: &str,
        new_branch: bool,
    ) -> Result<PathBuf, WorktreeError> {
        self.create_in(custom_dir, name, branch, new_branch).await
    }

    async fn create_in(
        &self,
        base: &Path,
        name: &str,
        branch: &str,
        new_branch: bool,
    ) -> Result<PathBuf, WorktreeError> {
        std::fs::create_dir_all(base)?;

        let mut wt_path = base.join(name);
        // A leftover directory with this name would make git refuse; pick a
        // unique sibling instead.
        if wt_path.exists() {
            wt_path = PathBuf::from(format!("{}-{}", wt_path.display(), unix_epoch()));
        }

        if new_branch {
            self.git
                .worktree_add(&self.repo_root, &wt_path, branch, true)
                .await?;
            return Ok(wt_path);
        }

        // Try checking out an existing branch first.
        if self
            .git
            .worktree_add(&self.repo_root, &wt_path, branch, false)
            .await
            .is_ok()
        {
            return Ok(wt_path);
        }

        // Branch might not exist; try creating it.
        match self
            .git
            .worktree_add(&self.repo_root, &wt_path, branch, true)
            .await
        {
            Ok(()) => Ok(wt_path),
            Err(first) => {
                // The branch exists but is checked out elsewhere. Last
                // resort: a uniquified branch name.
                let unique_branch = format!("{}-wt-{}", branch, unix_epoch());
                self.git
                    .worktree_add(&self.repo_root, &wt_path, &unique_branch, true)
                    .await
                    .map_err(|second| {
                        tracing::warn!(
                            branch,
                            error = %first,
                            "worktree fallback chain exhausted"
                        );
                        WorktreeError::Git(second)
                    })?;
                Ok(wt_path)
            }
        }
    }

    /// All worktrees registered for the repository.
    pub async fn list(&self) -> Result<Vec<Worktree>, WorktreeError> {
        Ok(self.git.worktree_list(&self.repo_root).await?)
    }

    /// Path of the first worktree checked out on `branch`, skipping bare
    /// and detached entries.
    pub async fn find_by_branch(&self, branch: &str) -> Option<PathBuf> {
        let worktrees = self.list().await.ok()?;
        worktrees
            .into_iter()
            .find(|wt| wt.branch == branch && !wt.bare && !wt.detached)
            .map(|wt| wt.path)
    }

    /// Map of branch name → worktree path for non-bare, non-detached
    /// worktrees. Used to annotate branch pickers.
    pub async fn branch_map(&self) -> std::collections::HashMap<String, PathBuf> {
        let Ok(worktrees) = self.list().await else {
            return std::collections::HashMap::new();
        };
        worktrees
            .into_iter()
            .filter(|wt| !wt.bare && !wt.detached && !wt.branch.is_empty())
            .map(|wt| (wt.branch, wt.path))
            .collect()
    }

    /// Remove a worktree. With `force`, uncommitted changes are discarded;
    /// caller policy decides when to force.
    pub async fn remove(&self, path: &Path, force: bool) -> Result<(), WorktreeError> {
        Ok(self
            .git
            .worktree_remove(&self.repo_root, path, force)
            .await?)
    }

    /// Whether a worktree at `path` is registered with git.
    pub async fn exists(&self, path: &Path) -> bool {
        let Ok(worktrees) = self.list().await else {
            return false;
        };
        let target = canonical(path);
        worktrees.iter().any(|wt| canonical(&wt.path) == target)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn unix_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "worktree_tests.rs"]
mod tests;
