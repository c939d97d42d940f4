// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git adapter: repo-root detection, branch enumeration, worktree CRUD.
//!
//! All operations shell out to the git CLI with bounded timeouts. Worktree
//! parsing follows `git worktree list --porcelain`.

use crate::subprocess::{combined_output, run_with_timeout, GIT_WORKTREE_TIMEOUT};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Timeout for quick metadata queries (rev-parse, branch listing).
const GIT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository: {0}")]
    NotARepository(String),
    #[error("worktree {op} failed: {detail}")]
    WorktreeFailed { op: &'static str, detail: String },
    #[error("{0}")]
    CommandFailed(String),
}

/// A git worktree entry parsed from porcelain output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Worktree {
    pub path: PathBuf,
    pub branch: String,
    pub head: String,
    pub bare: bool,
    pub detached: bool,
}

/// Git CLI wrapper. Stateless; every call names its target directory.
#[derive(Debug, Clone, Default)]
pub struct GitAdapter;

impl GitAdapter {
    pub fn new() -> Self {
        Self
    }

    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output, GitError> {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(dir).args(args);
        run_with_timeout(cmd, timeout, "git")
            .await
            .map_err(GitError::CommandFailed)
    }

    /// Resolve the repository root containing `dir`.
    pub async fn repo_root(&self, dir: &Path) -> Result<PathBuf, GitError> {
        let output = self
            .run(dir, &["rev-parse", "--show-toplevel"], GIT_QUERY_TIMEOUT)
            .await?;
        if !output.status.success() {
            return Err(GitError::NotARepository(dir.display().to_string()));
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(root))
    }

    /// Current branch name for a directory; empty when detached or not a repo.
    pub async fn current_branch(&self, dir: &Path) -> String {
        match self
            .run(dir, &["branch", "--show-current"], GIT_QUERY_TIMEOUT)
            .await
        {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            _ => String::new(),
        }
    }

    /// Local branch names.
    pub async fn local_branches(&self, repo: &Path) -> Result<Vec<String>, GitError> {
        let output = self
            .run(
                repo,
                &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
                GIT_QUERY_TIMEOUT,
            )
            .await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed(format!(
                "list branches: {}",
                combined_output(&output).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Remote branch names with the remote prefix stripped.
    ///
    /// Entries are kept only when the short name does not collide with a
    /// local branch; the symbolic `HEAD` pointer is filtered out.
    pub async fn remote_branches(&self, repo: &Path) -> Result<Vec<String>, GitError> {
        let local: HashSet<String> = self.local_branches(repo).await?.into_iter().collect();
        let output = self
            .run(
                repo,
                &["for-each-ref", "--format=%(refname:short)", "refs/remotes"],
                GIT_QUERY_TIMEOUT,
            )
            .await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed(format!(
                "list remote branches: {}",
                combined_output(&output).trim()
            )));
        }

        let mut seen = HashSet::new();
        let mut branches = Vec::new();
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            // "origin/feature-x" → "feature-x"
            let Some((_, short)) = line.split_once('/') else {
                continue;
            };
            if short == "HEAD" || short.is_empty() {
                continue;
            }
            if local.contains(short) || !seen.insert(short.to_string()) {
                continue;
            }
            branches.push(short.to_string());
        }
        Ok(branches)
    }

    /// List worktrees via porcelain parsing.
    pub async fn worktree_list(&self, repo: &Path) -> Result<Vec<Worktree>, GitError> {
        let output = self
            .run(repo, &["worktree", "list", "--porcelain"], GIT_QUERY_TIMEOUT)
            .await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed(format!(
                "list worktrees: {}",
                combined_output(&output).trim()
            )));
        }
        Ok(parse_worktree_porcelain(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    /// Add a worktree. With `new_branch` the branch is created via `-b` and
    /// the call fails if it already exists; otherwise the branch is checked
    /// out as-is.
    pub async fn worktree_add(
        &self,
        repo: &Path,
        path: &Path,
        branch: &str,
        new_branch: bool,
    ) -> Result<(), GitError> {
        let path_str = path.display().to_string();
        let args: Vec<&str> = if new_branch {
            vec!["worktree", "add", &path_str, "-b", branch]
        } else {
            vec!["worktree", "add", &path_str, branch]
        };
        let output = self.run(repo, &args, GIT_WORKTREE_TIMEOUT).await?;
        if !output.status.success() {
            return Err(GitError::WorktreeFailed {
                op: "add",
                detail: combined_output(&output).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Remove a worktree. With `force`, uncommitted changes are discarded.
    pub async fn worktree_remove(
        &self,
        repo: &Path,
        path: &Path,
        force: bool,
    ) -> Result<(), GitError> {
        let path_str = path.display().to_string();
        let mut args = vec!["worktree", "remove", path_str.as_str()];
        if force {
            args.push("--force");
        }
        let output = self.run(repo, &args, GIT_WORKTREE_TIMEOUT).await?;
        if !output.status.success() {
            return Err(GitError::WorktreeFailed {
                op: "remove",
                detail: combined_output(&output).trim().to_string(),
            });
        }
        Ok(())
    }
}

fn parse_worktree_porcelain(out: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut current = Worktree::default();

    for line in out.lines() {
        let line = line.trim();
        if let Some(path) = line.strip_prefix("worktree ") {
            if !current.path.as_os_str().is_empty() {
                worktrees.push(std::mem::take(&mut current));
            }
            current.path = PathBuf::from(path);
        } else if let Some(head) = line.strip_prefix("HEAD ") {
            current.head = head.to_string();
        } else if let Some(branch) = line.strip_prefix("branch ") {
            current.branch = branch.strip_prefix("refs/heads/").unwrap_or(branch).to_string();
        } else if line == "bare" {
            current.bare = true;
        } else if line == "detached" {
            current.detached = true;
        } else if line.is_empty() && !current.path.as_os_str().is_empty() {
            worktrees.push(std::mem::take(&mut current));
        }
    }
    if !current.path.as_os_str().is_empty() {
        worktrees.push(current);
    }
    worktrees
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
