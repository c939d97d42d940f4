// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;
use tempfile::TempDir;

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Initialise a repo with one commit on `main` and return its tempdir.
fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let run = |args: &[&str]| {
        let out = std::process::Command::new("git")
            .arg("-C")
            .arg(dir.path())
            .args(args)
            .output()
            .unwrap();
        assert!(
            out.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr)
        );
    };
    run(&["init", "-b", "main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "Test"]);
    std::fs::write(dir.path().join("README.md"), "hello\n").unwrap();
    run(&["add", "."]);
    run(&["commit", "-m", "initial", "--no-gpg-sign"]);
    dir
}

#[test]
fn porcelain_parse_handles_all_fields() {
    let out = "worktree /repo\nHEAD abcdef1234567890\nbranch refs/heads/main\n\nworktree /repo/.claude/worktrees/wt1\nHEAD 1111222233334444\nbranch refs/heads/feature-x\n\nworktree /repo/detached-wt\nHEAD 5555666677778888\ndetached\n";
    let wts = parse_worktree_porcelain(out);
    assert_eq!(wts.len(), 3);
    assert_eq!(wts[0].path, Path::new("/repo"));
    assert_eq!(wts[0].branch, "main");
    assert_eq!(wts[0].head, "abcdef1234567890");
    assert_eq!(wts[1].branch, "feature-x");
    assert!(wts[2].detached);
    assert!(wts[2].branch.is_empty());
}

#[test]
fn porcelain_parse_handles_bare_and_missing_trailing_newline() {
    let out = "worktree /bare-repo\nbare\n\nworktree /repo/wt\nHEAD aaaa\nbranch refs/heads/dev";
    let wts = parse_worktree_porcelain(out);
    assert_eq!(wts.len(), 2);
    assert!(wts[0].bare);
    assert_eq!(wts[1].branch, "dev");
}

#[test]
fn porcelain_parse_empty_input() {
    assert!(parse_worktree_porcelain("").is_empty());
}

#[tokio::test]
async fn repo_root_resolves_from_subdirectory() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let sub = repo.path().join("src");
    std::fs::create_dir(&sub).unwrap();

    let git = GitAdapter::new();
    let root = git.repo_root(&sub).await.unwrap();
    assert_eq!(
        root.canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn repo_root_fails_outside_repository() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let git = GitAdapter::new();
    let err = git.repo_root(dir.path()).await.unwrap_err();
    assert!(matches!(err, GitError::NotARepository(_)));
}

#[tokio::test]
async fn current_branch_reports_main() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let git = GitAdapter::new();
    assert_eq!(git.current_branch(repo.path()).await, "main");
}

#[tokio::test]
async fn current_branch_empty_outside_repo() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let git = GitAdapter::new();
    assert_eq!(git.current_branch(dir.path()).await, "");
}

#[tokio::test]
async fn local_branches_lists_created_branches() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let out = std::process::Command::new("git")
        .arg("-C")
        .arg(repo.path())
        .args(["branch", "feature-x"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let git = GitAdapter::new();
    let branches = git.local_branches(repo.path()).await.unwrap();
    assert!(branches.contains(&"main".to_string()));
    assert!(branches.contains(&"feature-x".to_string()));
}

#[tokio::test]
async fn worktree_add_and_list_and_remove() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let git = GitAdapter::new();
    let wt_path = repo.path().join("wt-feature");

    git.worktree_add(repo.path(), &wt_path, "feature-y", true)
        .await
        .unwrap();

    let wts = git.worktree_list(repo.path()).await.unwrap();
    assert_eq!(wts.len(), 2);
    assert!(wts.iter().any(|w| w.branch == "feature-y"));

    git.worktree_remove(repo.path(), &wt_path, false)
        .await
        .unwrap();
    let wts = git.worktree_list(repo.path()).await.unwrap();
    assert_eq!(wts.len(), 1);
}

#[tokio::test]
async fn worktree_add_new_branch_fails_if_branch_exists() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let git = GitAdapter::new();
    let wt_path = repo.path().join("wt-main");

    // main already exists; -b must refuse.
    let err = git
        .worktree_add(repo.path(), &wt_path, "main", true)
        .await
        .unwrap_err();
    assert!(matches!(err, GitError::WorktreeFailed { op: "add", .. }));
}
