// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

/// Random socket suffix for this test run so parallel runs don't share a
/// tmux server.
static TEST_SOCKET: LazyLock<String> = LazyLock::new(|| {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    format!("vf-test-{:04x}", nanos & 0xFFFF)
});

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_name(suffix: &str) -> String {
    let id = SESSION_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("session-20260101-010101-{:08x}-{}", id, suffix)
}

fn tmux_available() -> bool {
    std::process::Command::new("tmux")
        .arg("-V")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn adapter() -> TmuxAdapter {
    TmuxAdapter::new(&TEST_SOCKET)
}

#[test]
fn parses_plain_versions() {
    assert_eq!(parse_version("tmux 3.4"), Some((3, 4)));
    assert_eq!(parse_version("tmux 2.9"), Some((2, 9)));
}

#[test]
fn parses_next_prefix() {
    assert_eq!(parse_version("tmux next-3.5"), Some((3, 5)));
}

#[test]
fn parses_minor_suffix() {
    assert_eq!(parse_version("tmux 3.2a"), Some((3, 2)));
}

#[test]
fn rejects_garbage_version() {
    assert_eq!(parse_version("tmux"), None);
    assert_eq!(parse_version(""), None);
    assert_eq!(parse_version("tmux three.two"), None);
}

#[test]
fn redacts_token_bearing_env_args() {
    let args = vec![
        "-e".to_string(),
        "GEMINI_API_KEY=abc123".to_string(),
        "-e".to_string(),
        "VIBEFLOW_TOKEN=tok".to_string(),
        "-e".to_string(),
        "PLAIN=ok".to_string(),
    ];
    let redacted = redact_args(&args);
    assert_eq!(redacted[1], "GEMINI_API_KEY=<redacted>");
    assert_eq!(redacted[3], "VIBEFLOW_TOKEN=<redacted>");
    assert_eq!(redacted[5], "PLAIN=ok");
}

#[tokio::test]
#[serial(tmux)]
async fn list_sessions_on_fresh_socket_is_empty() {
    if !tmux_available() {
        return;
    }
    let adapter = TmuxAdapter::new("vf-test-nosrv");
    // No server has ever started on this socket; "no server running" must
    // read as an empty set.
    let sessions = adapter.list_sessions().await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
#[serial(tmux)]
async fn create_list_capture_kill_round_trip() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    adapter.ensure_server().await.unwrap();

    let name = unique_name("a");
    let opts = CreateSessionOpts {
        name: name.clone(),
        kind: "claude".into(),
        work_dir: "/tmp".into(),
        command: "echo vf-capture-probe && sleep 60".into(),
        env: vec![],
        branch: "main".into(),
        project: "test".into(),
    };
    adapter.create_session(&opts).await.unwrap();

    let full = full_session_name("claude", &name);
    assert!(adapter.has_session(&full).await);

    let listed = adapter.list_sessions().await.unwrap();
    assert!(listed.iter().any(|s| s.name == full), "missing {}", full);

    tokio::time::sleep(tokio::time::Duration::from_millis(300)).await;
    let output = adapter.capture_pane(&full, 50).await.unwrap();
    assert!(output.contains("vf-capture-probe"));

    adapter.kill(&full).await.unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    assert!(!adapter.has_session(&full).await);
}

#[tokio::test]
#[serial(tmux)]
async fn create_replaces_existing_session_with_same_name() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    adapter.ensure_server().await.unwrap();

    let name = unique_name("b");
    let opts = CreateSessionOpts {
        name: name.clone(),
        kind: "codex".into(),
        work_dir: "/tmp".into(),
        command: "sleep 60".into(),
        ..Default::default()
    };
    adapter.create_session(&opts).await.unwrap();
    adapter.create_session(&opts).await.unwrap();

    let full = full_session_name("codex", &name);
    assert!(adapter.has_session(&full).await);
    adapter.kill(&full).await.unwrap();
}

#[tokio::test]
#[serial(tmux)]
async fn send_keys_requires_existing_session() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    let result = adapter.send_keys("vibeflow_missing-xyz", "hello").await;
    assert!(matches!(result, Err(MuxError::SessionNotFound(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn send_keys_empty_text_is_noop() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    // No session needed; empty input returns before any tmux call.
    adapter.send_keys("vibeflow_missing-xyz", "").await.unwrap();
}

#[tokio::test]
#[serial(tmux)]
async fn kill_missing_session_is_nonfatal() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    adapter.ensure_server().await.unwrap();
    adapter.kill("vibeflow_missing-xyz").await.unwrap();
}

#[tokio::test]
#[serial(tmux)]
async fn find_session_by_id_substring() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    adapter.ensure_server().await.unwrap();

    let name = unique_name("c");
    let opts = CreateSessionOpts {
        name: name.clone(),
        kind: "claude".into(),
        work_dir: "/tmp".into(),
        command: "sleep 60".into(),
        ..Default::default()
    };
    adapter.create_session(&opts).await.unwrap();

    let found = adapter.find_session_by_session_id(&name).await;
    assert_eq!(found, Some(full_session_name("claude", &name)));

    let missing = adapter
        .find_session_by_session_id("session-19990101-000000-ffffffff")
        .await;
    assert_eq!(missing, None);

    adapter.kill(&full_session_name("claude", &name)).await.unwrap();
}

#[tokio::test]
#[serial(tmux)]
async fn pane_work_dir_reports_spawn_directory() {
    if !tmux_available() {
        return;
    }
    let adapter = adapter();
    adapter.ensure_server().await.unwrap();

    let name = unique_name("d");
    let opts = CreateSessionOpts {
        name: name.clone(),
        kind: "claude".into(),
        work_dir: "/tmp".into(),
        command: "sleep 60".into(),
        ..Default::default()
    };
    adapter.create_session(&opts).await.unwrap();

    let full = full_session_name("claude", &name);
    let dir = adapter.pane_work_dir(&full).await;
    // Some systems resolve /tmp through a symlink (e.g. /private/tmp).
    assert!(dir.ends_with("tmp"), "unexpected pane dir: {}", dir);

    adapter.kill(&full).await.unwrap();
}
