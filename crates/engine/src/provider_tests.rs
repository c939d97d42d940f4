// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_include_three_agents() {
    let providers = default_providers();
    assert!(providers.contains_key("claude"));
    assert!(providers.contains_key("codex"));
    assert!(providers.contains_key("gemini"));

    let claude = &providers["claude"];
    assert!(claude.default);
    assert!(claude.vibeflow_integrated);
    assert_eq!(claude.session_file, ".vibeflow-session");
    assert_eq!(claude.skip_permissions_flag, "--dangerously-skip-permissions");
}

#[test]
fn default_key_prefers_flagged_provider() {
    let registry = ProviderRegistry::new(default_providers());
    assert_eq!(registry.default_key(), Some("claude"));
}

#[test]
fn default_key_falls_back_to_claude_then_first() {
    let mut providers = default_providers();
    for p in providers.values_mut() {
        p.default = false;
    }
    let registry = ProviderRegistry::new(providers.clone());
    assert_eq!(registry.default_key(), Some("claude"));

    providers.remove("claude");
    let registry = ProviderRegistry::new(providers);
    assert_eq!(registry.default_key(), Some("codex"));
}

#[test]
fn list_is_sorted_by_key() {
    let registry = ProviderRegistry::new(default_providers());
    let keys: Vec<&str> = registry.list().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["claude", "codex", "gemini"]);
}

#[test]
fn unknown_provider_is_unavailable() {
    let registry = ProviderRegistry::new(default_providers());
    assert!(!registry.is_available("no-such-provider"));
}

#[test]
fn absolute_path_binary_availability_follows_exec_bit() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempfile::TempDir::new().unwrap();
    let bin = dir.path().join("fake-agent");
    std::fs::write(&bin, "#!/bin/sh\n").unwrap();

    let mut providers = HashMap::new();
    providers.insert(
        "fake".to_string(),
        Provider {
            name: "Fake".to_string(),
            binary: bin.display().to_string(),
            ..Provider::default()
        },
    );
    let mut registry = ProviderRegistry::new(providers);
    // no exec bit yet
    assert!(!registry.is_available("fake"));

    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
    registry.refresh();
    assert!(registry.is_available("fake"));
}

#[test]
fn set_binary_rechecks_availability() {
    let mut registry = ProviderRegistry::new(default_providers());
    assert!(!registry.set_binary("claude", "/nonexistent/claude"));
    assert!(!registry.is_available("claude"));
    assert!(!registry.set_binary("unknown", "sh"));
}

#[test]
fn path_binary_resolution_finds_sh() {
    // /bin/sh exists on any unix; "sh" must resolve through PATH.
    let mut providers = HashMap::new();
    providers.insert(
        "shell".to_string(),
        Provider {
            name: "Shell".to_string(),
            binary: "sh".to_string(),
            ..Provider::default()
        },
    );
    let registry = ProviderRegistry::new(providers);
    assert!(registry.is_available("shell"));
}
