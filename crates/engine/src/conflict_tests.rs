// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use vf_adapters::FakeMuxAdapter;

const ID: &str = "session-20260101-010101-aaaaaaaa";

fn no_mux() -> Option<&'static FakeMuxAdapter> {
    None
}

#[tokio::test]
async fn missing_marker_is_none() {
    let dir = TempDir::new().unwrap();
    let result = check(dir.path(), "", no_mux()).await;
    assert_eq!(result.status, ConflictStatus::None);
}

#[tokio::test]
async fn empty_marker_is_none() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".vibeflow-session"), "\n").unwrap();
    let result = check(dir.path(), "", no_mux()).await;
    assert_eq!(result.status, ConflictStatus::None);
}

#[tokio::test]
async fn garbage_marker_is_none() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".vibeflow-session"), "not-a-session-id\n").unwrap();
    let result = check(dir.path(), "", no_mux()).await;
    assert_eq!(result.status, ConflictStatus::None);
}

#[tokio::test]
async fn marker_without_mux_is_external() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();

    let result = check(dir.path(), "", no_mux()).await;
    assert_eq!(result.status, ConflictStatus::External);
    assert_eq!(result.session_id, ID);
    assert_eq!(result.provider, "claude");
    assert_eq!(result.file_path, dir.path().join(".vibeflow-session"));
}

#[tokio::test]
async fn unbound_marker_with_dead_session_is_stale() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();

    let mux = FakeMuxAdapter::new();
    let result = check(dir.path(), "", Some(&mux)).await;
    assert_eq!(result.status, ConflictStatus::Stale);
    assert!(result.tmux_session.is_empty());
}

#[tokio::test]
async fn scanning_adopts_live_session_and_derives_kind() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();

    let mux = FakeMuxAdapter::new();
    mux.add_session(&format!("vibeflow_codex-{}", ID));

    let result = check(dir.path(), "", Some(&mux)).await;
    assert_eq!(result.status, ConflictStatus::Active);
    assert_eq!(result.provider, "codex");
    assert_eq!(result.tmux_session, format!("vibeflow_codex-{}", ID));
}

#[tokio::test]
async fn explicit_binding_is_trusted() {
    let dir = TempDir::new().unwrap();
    let content = format!("{}\nprovider=gemini\ntmux_session=vibeflow_gemini-{}\n", ID, ID);
    std::fs::write(dir.path().join(".vibeflow-session"), content).unwrap();

    // Bound session alive.
    let mux = FakeMuxAdapter::new();
    mux.add_session(&format!("vibeflow_gemini-{}", ID));
    let result = check(dir.path(), "", Some(&mux)).await;
    assert_eq!(result.status, ConflictStatus::Active);
    assert_eq!(result.provider, "gemini");

    // Bound session dead.
    let empty = FakeMuxAdapter::new();
    let result = check(dir.path(), "", Some(&empty)).await;
    assert_eq!(result.status, ConflictStatus::Stale);
}

#[tokio::test]
async fn marker_round_trip_never_classifies_active_against_dead_mux() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "dev", ID).unwrap();

    assert_eq!(read_marker_id(dir.path(), "dev").as_deref(), Some(ID));

    // Disconnected mux (no adapter) → external; empty mux → stale.
    let result = check(dir.path(), "dev", no_mux()).await;
    assert_eq!(result.status, ConflictStatus::External);
    let mux = FakeMuxAdapter::new();
    let result = check(dir.path(), "dev", Some(&mux)).await;
    assert_eq!(result.status, ConflictStatus::Stale);
}

#[tokio::test]
async fn persona_scoped_markers_do_not_collide() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", "session-20260101-010101-aaaaaaaa").unwrap();
    write_marker(dir.path(), "architect", "session-20260101-010101-bbbbbbbb").unwrap();

    assert_eq!(
        marker_file_name("architect"),
        ".vibeflow-session-architect"
    );

    let vanilla = read_marker_id(dir.path(), "").unwrap();
    let architect = read_marker_id(dir.path(), "architect").unwrap();
    assert_ne!(vanilla, architect);
}

#[tokio::test]
async fn check_all_sessions_returns_one_result_per_persona() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", "session-20260101-010101-aaaaaaaa").unwrap();
    write_marker(dir.path(), "architect", "session-20260101-010101-bbbbbbbb").unwrap();
    write_marker(dir.path(), "reviewer", "session-20260101-010101-cccccccc").unwrap();
    // Unrelated files are ignored.
    std::fs::write(dir.path().join("README.md"), "x").unwrap();

    let mux = FakeMuxAdapter::new();
    mux.add_session("vibeflow_claude-session-20260101-010101-bbbbbbbb");

    let results = check_all_sessions(dir.path(), Some(&mux)).await;
    assert_eq!(results.len(), 3);
    // Ordered by persona: "", "architect", "reviewer".
    assert_eq!(results[0].persona, "");
    assert_eq!(results[0].status, ConflictStatus::Stale);
    assert_eq!(results[1].persona, "architect");
    assert_eq!(results[1].status, ConflictStatus::Active);
    assert_eq!(results[2].persona, "reviewer");
    assert_eq!(results[2].status, ConflictStatus::Stale);
}

#[tokio::test]
async fn cleanup_then_check_is_none() {
    // Stale cleanup: marker for a vanished session is removed, after which
    // the directory checks clean.
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();

    let mux = FakeMuxAdapter::new();
    let result = check(dir.path(), "", Some(&mux)).await;
    assert_eq!(result.status, ConflictStatus::Stale);

    cleanup_marker(dir.path(), "").unwrap();
    let result = check(dir.path(), "", Some(&mux)).await;
    assert_eq!(result.status, ConflictStatus::None);
}

#[test]
fn write_if_needed_skips_matching_content() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();
    let before = std::fs::metadata(dir.path().join(".vibeflow-session"))
        .unwrap()
        .modified()
        .unwrap();

    std::thread::sleep(std::time::Duration::from_millis(20));
    write_marker_if_needed(dir.path(), "", ID).unwrap();
    let after = std::fs::metadata(dir.path().join(".vibeflow-session"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(before, after, "matching marker must not be rewritten");

    write_marker_if_needed(dir.path(), "", "session-20260101-010101-ffffffff").unwrap();
    assert_eq!(
        read_marker_id(dir.path(), "").as_deref(),
        Some("session-20260101-010101-ffffffff")
    );
}

#[cfg(unix)]
#[test]
fn marker_mode_is_0600() {
    use std::os::unix::fs::PermissionsExt;
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();
    let mode = std::fs::metadata(dir.path().join(".vibeflow-session"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn remove_marker_tolerates_missing_file() {
    let dir = TempDir::new().unwrap();
    remove_marker(dir.path(), "");
    remove_marker(dir.path(), "dev");
}

#[test]
fn marker_content_is_bare_id_line() {
    let dir = TempDir::new().unwrap();
    write_marker(dir.path(), "", ID).unwrap();
    let content = std::fs::read_to_string(dir.path().join(".vibeflow-session")).unwrap();
    assert_eq!(content, format!("{}\n", ID));
}
