// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

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

#[tokio::test]
async fn new_fails_outside_repository() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let err = WorktreeManager::new(dir.path(), ".claude/worktrees").await;
    assert!(matches!(err, Err(WorktreeError::Git(GitError::NotARepository(_)))));
}

#[tokio::test]
async fn create_places_worktree_under_base_dir() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let wm = WorktreeManager::new(repo.path(), ".claude/worktrees")
        .await
        .unwrap();

    let path = wm.create("claude-main-1", "feature-a", false).await.unwrap();
    assert!(path.starts_with(repo.path().join(".claude/worktrees")));
    assert!(path.join(".git").exists());

    let wts = wm.list().await.unwrap();
    assert!(wts.iter().any(|w| w.branch == "feature-a"));
}

#[tokio::test]
async fn create_checks_out_existing_branch() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let out = std::process::Command::new("git")
        .arg("-C")
        .arg(repo.path())
        .args(["branch", "existing-branch"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();
    let path = wm.create("wt-existing", "existing-branch", false).await.unwrap();

    assert_eq!(wm.find_by_branch("existing-branch").await, Some(path));
}

#[tokio::test]
async fn create_new_branch_mode_fails_on_existing_branch() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();
    let err = wm.create("wt-main", "main", true).await;
    assert!(err.is_err(), "-b with an existing branch must fail");
}

#[tokio::test]
async fn existing_path_gets_epoch_suffix() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();

    // Occupy the target path on disk.
    std::fs::create_dir_all(repo.path().join("wts/claude-main")).unwrap();

    let path = wm.create("claude-main", "feature-b", false).await.unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(
        name.starts_with("claude-main-"),
        "expected epoch-suffixed name, got {}",
        name
    );
}

#[tokio::test]
async fn checked_out_branch_falls_back_to_uniquified_branch() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();

    // "main" is checked out in the primary worktree, so neither checkout
    // nor -b can succeed; the fallback branch name must kick in.
    let path = wm.create("wt-fallback", "main", false).await.unwrap();
    let wts = wm.list().await.unwrap();
    let created = wts
        .iter()
        .find(|w| canonical(&w.path) == canonical(&path))
        .unwrap();
    assert!(
        created.branch.starts_with("main-wt-"),
        "expected uniquified branch, got {}",
        created.branch
    );
}

#[tokio::test]
async fn create_in_dir_uses_custom_base() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let custom = TempDir::new().unwrap();
    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();

    let path = wm
        .create_in_dir(custom.path(), "custom-wt", "feature-c", false)
        .await
        .unwrap();
    assert!(path.starts_with(custom.path()));
    assert!(wm.exists(&path).await);
}

#[tokio::test]
async fn branch_map_skips_detached_and_bare() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();
    wm.create("wt-one", "feature-d", false).await.unwrap();

    let map = wm.branch_map().await;
    assert!(map.contains_key("main"));
    assert!(map.contains_key("feature-d"));
    assert_eq!(wm.find_by_branch("no-such-branch").await, None);
}

#[tokio::test]
async fn remove_without_force_keeps_dirty_worktree() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    let wm = WorktreeManager::new(repo.path(), "wts").await.unwrap();
    let path = wm.create("wt-dirty", "feature-e", false).await.unwrap();

    // Make the worktree dirty.
    std::fs::write(path.join("dirty.txt"), "uncommitted\n").unwrap();

    assert!(wm.remove(&path, false).await.is_err());
    assert!(path.exists());

    wm.remove(&path, true).await.unwrap();
    assert!(!path.exists());
    assert!(!wm.exists(&path).await);
}
