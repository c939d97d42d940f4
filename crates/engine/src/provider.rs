// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent providers.
//!
//! A provider is a data record describing one AI coding agent (binary,
//! launch template, env), not a trait hierarchy. Adding an agent is adding
//! a record to the config. The registry caches binary availability so the
//! UI can grey out agents that aren't installed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// An AI coding agent that can be launched in a mux session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    /// Display name (e.g. "Claude Code").
    pub name: String,
    /// Binary name on PATH, or an absolute path.
    pub binary: String,
    /// Launch template; see [`vf_core::render_launch_command`] for the
    /// available `${...}` variables.
    pub launch_template: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prompt_template: String,
    /// Flag substituted for `${skip_flag}` when permissions are skipped.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub skip_permissions_flag: String,
    /// Extra environment entries for the session. `${VAR}` references are
    /// expanded from the ambient environment at launch time.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    /// True when the agent understands the management-server integration.
    pub vibeflow_integrated: bool,
    /// Marker file name the agent reads for its session id; empty disables
    /// marker writing for this provider.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_file: String,
    /// Marks the provider chosen when none is configured.
    pub default: bool,
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            name: String::new(),
            binary: String::new(),
            launch_template: String::new(),
            prompt_template: String::new(),
            skip_permissions_flag: String::new(),
            env: HashMap::new(),
            vibeflow_integrated: false,
            session_file: String::new(),
            default: false,
        }
    }
}

/// Built-in providers; user config merges on top.
pub fn default_providers() -> HashMap<String, Provider> {
    let mut providers = HashMap::new();
    providers.insert(
        "claude".to_string(),
        Provider {
            name: "Claude Code".to_string(),
            binary: "claude".to_string(),
            launch_template: "${binary} ${skip_flag}".to_string(),
            skip_permissions_flag: "--dangerously-skip-permissions".to_string(),
            vibeflow_integrated: true,
            session_file: ".vibeflow-session".to_string(),
            default: true,
            ..Provider::default()
        },
    );
    providers.insert(
        "codex".to_string(),
        Provider {
            name: "OpenAI Codex CLI".to_string(),
            binary: "codex".to_string(),
            launch_template: "${binary} ${skip_flag}".to_string(),
            skip_permissions_flag: "--full-auto".to_string(),
            ..Provider::default()
        },
    );
    providers.insert(
        "gemini".to_string(),
        Provider {
            name: "Google Gemini CLI".to_string(),
            binary: "gemini".to_string(),
            launch_template: "${binary} ${skip_flag}".to_string(),
            skip_permissions_flag: "-sandbox=none".to_string(),
            ..Provider::default()
        },
    );
    providers
}

/// Configured providers plus cached binary availability.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Provider>,
    available: HashMap<String, bool>,
}

impl ProviderRegistry {
    /// Build a registry from a provider map and probe availability once.
    pub fn new(providers: HashMap<String, Provider>) -> Self {
        let mut registry = Self {
            providers,
            available: HashMap::new(),
        };
        registry.refresh();
        registry
    }

    /// All providers sorted by config key.
    pub fn list(&self) -> Vec<(&str, &Provider)> {
        let mut entries: Vec<(&str, &Provider)> = self
            .providers
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// Provider keys sorted alphabetically.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn get(&self, key: &str) -> Option<&Provider> {
        self.providers.get(key)
    }

    /// The provider marked default, falling back to "claude", then the
    /// first key alphabetically.
    pub fn default_key(&self) -> Option<&str> {
        if let Some((key, _)) = self.providers.iter().find(|(_, p)| p.default) {
            return Some(key.as_str());
        }
        if self.providers.contains_key("claude") {
            return Some("claude");
        }
        self.keys().first().copied()
    }

    /// Whether the named provider's binary is on PATH (or a valid absolute
    /// path), per the last refresh.
    pub fn is_available(&self, key: &str) -> bool {
        self.available.get(key).copied().unwrap_or(false)
    }

    /// Update a provider's binary path and re-check its availability.
    /// Returns true when the provider exists and the new binary is found.
    pub fn set_binary(&mut self, key: &str, binary: &str) -> bool {
        let Some(provider) = self.providers.get_mut(key) else {
            return false;
        };
        provider.binary = binary.to_string();
        let ok = binary_available(binary);
        self.available.insert(key.to_string(), ok);
        ok
    }

    /// Re-check binary availability for all providers. Call on refresh so
    /// newly-installed binaries are detected.
    pub fn refresh(&mut self) {
        self.available = self
            .providers
            .iter()
            .map(|(key, p)| (key.clone(), binary_available(&p.binary)))
            .collect();
    }
}

/// True when `binary` is an executable absolute path or resolvable on PATH.
fn binary_available(binary: &str) -> bool {
    if binary.is_empty() {
        return false;
    }
    let path = Path::new(binary);
    if path.is_absolute() {
        return is_executable(path);
    }
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| is_executable(&dir.join(binary)))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
