// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn create_then_list_and_kill() {
    let fake = FakeMuxAdapter::new();
    let opts = CreateSessionOpts {
        name: "session-20260101-010101-aaaaaaaa".into(),
        kind: "claude".into(),
        work_dir: "/tmp/repoA".into(),
        command: "claude".into(),
        ..Default::default()
    };
    fake.create_session(&opts).await.unwrap();

    let sessions = fake.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(
        sessions[0].name,
        "vibeflow_claude-session-20260101-010101-aaaaaaaa"
    );
    assert!(fake.has_session(&sessions[0].name).await);

    fake.kill(&sessions[0].name).await.unwrap();
    assert!(fake.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn send_keys_records_and_validates_target() {
    let fake = FakeMuxAdapter::new();
    fake.add_session("vibeflow_claude-session-20260101-010101-aaaaaaaa");

    fake.send_keys("vibeflow_claude-session-20260101-010101-aaaaaaaa", "retry")
        .await
        .unwrap();
    assert_eq!(
        fake.sent_keys(),
        vec![(
            "vibeflow_claude-session-20260101-010101-aaaaaaaa".to_string(),
            "retry".to_string()
        )]
    );

    let err = fake.send_keys("vibeflow_missing", "retry").await;
    assert!(matches!(err, Err(MuxError::SessionNotFound(_))));
}

#[tokio::test]
async fn find_by_id_scans_session_names() {
    let fake = FakeMuxAdapter::new();
    fake.add_session("vibeflow_codex-session-20260101-010101-deadbeef");

    let found = fake
        .find_session_by_session_id("session-20260101-010101-deadbeef")
        .await;
    assert_eq!(
        found.as_deref(),
        Some("vibeflow_codex-session-20260101-010101-deadbeef")
    );
    assert_eq!(fake.find_session_by_session_id("nope").await, None);
}

#[tokio::test]
async fn scripted_capture_and_work_dir() {
    let fake = FakeMuxAdapter::new();
    fake.add_session("vibeflow_claude-x");
    fake.set_capture("vibeflow_claude-x", "line one\nAPI Error: 500");
    fake.set_work_dir("vibeflow_claude-x", "/tmp/repoA");

    assert_eq!(
        fake.capture_pane("vibeflow_claude-x", 10).await.unwrap(),
        "line one\nAPI Error: 500"
    );
    assert_eq!(fake.pane_work_dir("vibeflow_claude-x").await, "/tmp/repoA");
}
