// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn matches_claude_5xx() {
    let registry = PatternRegistry::new();
    let m = registry.match_output("claude", "API Error: 503 upstream").unwrap();
    assert_eq!(m.severity, Severity::Recoverable);
    assert!(!m.requires_backoff);
    assert_eq!(m.description, "Claude API 5xx server error");
}

#[test]
fn specific_529_wins_over_generic_5xx() {
    let registry = PatternRegistry::new();
    let m = registry.match_output("claude", "API Error: 529").unwrap();
    assert_eq!(m.description, "Claude API overloaded (529)");
    assert!(m.requires_backoff);
}

#[test]
fn rate_limit_429_carries_backoff() {
    let registry = PatternRegistry::new();
    let m = registry.match_output("claude", "API Error: 429").unwrap();
    assert_eq!(m.description, "Claude API rate limit (429)");
    assert!(m.requires_backoff);
}

#[test]
fn connection_errors_match_case_insensitively() {
    let registry = PatternRegistry::new();
    assert!(registry
        .match_output("claude", "Error: Connection REFUSED by host")
        .is_some());
    assert!(registry.match_output("claude", "request timed out").is_some());
    assert!(registry.match_output("claude", "ETIMEDOUT").is_some());
}

#[test]
fn kind_filter_excludes_other_agents() {
    let registry = PatternRegistry::new();
    // Claude-only signature must not match for codex.
    assert!(registry.match_output("codex", "API Error: 500").is_none());
    assert!(registry
        .match_output("codex", "OpenAI API Error: something")
        .is_some());
}

#[test]
fn gemini_patterns() {
    let registry = PatternRegistry::new();
    let m = registry
        .match_output("gemini", "status: RESOURCE_EXHAUSTED")
        .unwrap();
    assert!(m.requires_backoff);

    let m = registry
        .match_output("gemini", "Internal Server Error from google.api")
        .unwrap();
    assert!(!m.requires_backoff);
}

#[test]
fn universal_fatal_patterns_apply_to_any_kind() {
    let registry = PatternRegistry::new();
    for kind in ["claude", "codex", "gemini", "custom"] {
        let m = registry
            .match_output(kind, "some output\npanic: runtime error\nmore")
            .unwrap();
        assert_eq!(m.severity, Severity::Fatal);
        assert!(m.recovery_message.is_empty());
    }
    let m = registry
        .match_output("claude", "fatal error: out of memory")
        .unwrap();
    assert_eq!(m.severity, Severity::Fatal);
}

#[test]
fn panic_matches_only_at_line_start() {
    let registry = PatternRegistry::new();
    assert!(registry
        .match_output("codex", "discussing a panic: in code")
        .is_none());
}

#[test]
fn no_match_returns_none() {
    let registry = PatternRegistry::new();
    assert!(registry.match_output("claude", "all good here").is_none());
    assert!(registry.match_output("claude", "").is_none());
}

#[test]
fn match_is_deterministic() {
    let registry = PatternRegistry::new();
    let text = "API Error: 529";
    let first = registry.match_output("claude", text).unwrap().description.clone();
    for _ in 0..10 {
        assert_eq!(
            registry.match_output("claude", text).unwrap().description,
            first
        );
    }
}

#[test]
fn add_pattern_extends_registry_at_runtime() {
    let mut registry = PatternRegistry::new();
    assert!(registry.match_output("aider", "custom failure XYZ").is_none());

    registry.add_pattern(ErrorPattern {
        kind: "aider".to_string(),
        regex: Regex::new("custom failure XYZ").unwrap(),
        severity: Severity::Recoverable,
        recovery_message: "retry".to_string(),
        requires_backoff: false,
        description: "custom".to_string(),
    });
    assert!(registry.match_output("aider", "custom failure XYZ").is_some());
}
