// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn full_name_with_kind() {
    assert_eq!(
        full_session_name("claude", "session-20260101-010101-aaaaaaaa"),
        "vibeflow_claude-session-20260101-010101-aaaaaaaa"
    );
}

#[test]
fn full_name_without_kind() {
    assert_eq!(full_session_name("", "mysession"), "vibeflow_mysession");
}

#[test]
fn ensure_prefix_adds_only_when_missing() {
    assert_eq!(ensure_prefix("foo"), "vibeflow_foo");
    assert_eq!(ensure_prefix("vibeflow_foo"), "vibeflow_foo");
}

#[test]
fn parse_kind_from_full_name() {
    assert_eq!(
        parse_session_kind("vibeflow_codex-session-20260101-010101-deadbeef"),
        Some("codex")
    );
}

#[test]
fn parse_kind_requires_prefix() {
    assert_eq!(parse_session_kind("codex-session-x"), None);
}

#[test]
fn parse_kind_requires_separator() {
    assert_eq!(parse_session_kind("vibeflow_plainname"), None);
}

#[test]
fn short_name_strips_prefix_and_kind() {
    assert_eq!(
        short_name("vibeflow_claude-session-20260101-010101-aaaaaaaa"),
        "session-20260101-010101-aaaaaaaa"
    );
}

#[test]
fn round_trip_compose_parse() {
    let full = full_session_name("gemini", "session-20260101-010101-aaaaaaaa");
    assert_eq!(parse_session_kind(&full), Some("gemini"));
    assert_eq!(short_name(&full), "session-20260101-010101-aaaaaaaa");
}
