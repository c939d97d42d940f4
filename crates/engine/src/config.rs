// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading and saving.
//!
//! The config lives at `~/.vibeflow-cli/config.yaml`. Loading starts from
//! built-in defaults, merges the file on top, and finally applies the
//! `VIBEFLOW_URL` / `VIBEFLOW_TOKEN` environment overrides. A missing file
//! is not an error; a malformed one is a startup error naming the file.

use crate::provider::{default_providers, Provider};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("write config {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("serialize config: {0}")]
    Serialize(serde_yaml::Error),
    #[error("home directory not found")]
    NoHomeDir,
}

/// Settings for git worktree management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorktreeConfig {
    pub base_dir: String,
    pub auto_create: bool,
    /// "ask", "always", or "never".
    pub cleanup_on_kill: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_custom_dir: String,
}

impl Default for WorktreeConfig {
    fn default() -> Self {
        Self {
            base_dir: ".claude/worktrees".to_string(),
            auto_create: true,
            cleanup_on_kill: "ask".to_string(),
            last_custom_dir: String::new(),
        }
    }
}

/// Settings for automatic error detection and recovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorRecoveryConfig {
    pub enabled: bool,
    pub max_retries: u32,
    pub debounce_seconds: u64,
    pub backoff_multiplier: u32,
}

impl Default for ErrorRecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            debounce_seconds: 5,
            backoff_multiplier: 2,
        }
    }
}

/// All vibeflow-cli configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_project: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_work_dir: String,
    pub tmux_socket: String,
    pub poll_interval_seconds: u64,
    pub default_provider: String,
    pub providers: HashMap<String, Provider>,
    pub worktree: WorktreeConfig,
    pub error_recovery: ErrorRecoveryConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directory_history: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub saved_env_vars: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:7080".to_string(),
            api_token: String::new(),
            default_project: String::new(),
            default_work_dir: String::new(),
            tmux_socket: "vibeflow".to_string(),
            poll_interval_seconds: 5,
            default_provider: "claude".to_string(),
            providers: default_providers(),
            worktree: WorktreeConfig::default(),
            error_recovery: ErrorRecoveryConfig::default(),
            directory_history: Vec::new(),
            saved_env_vars: HashMap::new(),
        }
    }
}

impl Config {
    /// Resolve the working directory to use.
    /// Priority: explicit > default_work_dir > current directory.
    pub fn resolve_work_dir(&self, explicit: Option<&str>) -> PathBuf {
        match explicit {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ if !self.default_work_dir.is_empty() => PathBuf::from(&self.default_work_dir),
            _ => PathBuf::from("."),
        }
    }

    /// Add a directory to the front of the history, deduplicating and
    /// capping at 10 entries.
    pub fn add_directory_to_history(&mut self, dir: &str) {
        self.directory_history.retain(|d| d != dir);
        self.directory_history.insert(0, dir.to_string());
        self.directory_history.truncate(10);
    }
}

/// Default config file path (`~/.vibeflow-cli/config.yaml`).
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".vibeflow-cli").join("config.yaml"))
}

/// Load config from `path`, falling back to defaults when missing.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let mut cfg = match std::fs::read_to_string(path) {
        Ok(data) => {
            serde_yaml::from_str::<Config>(&data).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    // User-defined providers merge on top of built-in defaults so old
    // configs without a providers section still work.
    for (key, provider) in default_providers() {
        cfg.providers.entry(key).or_insert(provider);
    }

    if let Ok(v) = std::env::var("VIBEFLOW_URL") {
        if !v.is_empty() {
            cfg.server_url = v;
        }
    }
    if let Ok(v) = std::env::var("VIBEFLOW_TOKEN") {
        if !v.is_empty() {
            cfg.api_token = v;
        }
    }

    Ok(cfg)
}

/// Write config to `path` at mode 0600.
pub fn save(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })?;
    }
    let data = serde_yaml::to_string(cfg).map_err(ConfigError::Serialize)?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(
            |source| ConfigError::Write {
                path: path.display().to_string(),
                source,
            },
        )?;
    }
    Ok(())
}

/// Read `~/.codex/config.toml` and return the `bearer_token_env_var` value
/// from the `[mcp_servers.vibeflow]` section, if present.
pub fn read_codex_bearer_token_env_var() -> Option<String> {
    let home = dirs::home_dir()?;
    let data = std::fs::read_to_string(home.join(".codex").join("config.toml")).ok()?;
    parse_codex_bearer_token_env_var(&data)
}

/// Extract `bearer_token_env_var` from a TOML string, line-wise.
///
/// Only the `[mcp_servers.vibeflow]` section is consulted.
fn parse_codex_bearer_token_env_var(content: &str) -> Option<String> {
    let mut in_vibeflow_section = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.starts_with('[') {
            in_vibeflow_section = trimmed == "[mcp_servers.vibeflow]";
            continue;
        }
        if in_vibeflow_section {
            if let Some((key, val)) = trimmed.split_once('=') {
                if key.trim() == "bearer_token_env_var" {
                    let val = val.trim().trim_matches(|c| c == '"' || c == '\'');
                    if !val.is_empty() {
                        return Some(val.to_string());
                    }
                    return None;
                }
            }
        }
    }
    None
}

/// Strip surrounding brackets, quotes, and whitespace from a token value.
/// Users sometimes paste tokens wrapped in `[...]` or `"..."`.
fn clean_env_token(val: &str) -> String {
    val.trim_matches(|c: char| {
        c == '[' || c == ']' || c == '"' || c == '\'' || c.is_ascii_whitespace()
    })
    .to_string()
}

/// Resolve the environment variables a provider needs at launch.
///
/// Values are sourced from the saved-config map first, then the process
/// environment. Returns the resolved map and the name of any variable that
/// still needs a value (`None` when everything is resolved).
pub fn resolve_provider_env(
    cfg: &Config,
    provider_key: &str,
) -> (HashMap<String, String>, Option<String>) {
    let mut env = HashMap::new();

    let var_name = match provider_key {
        "codex" => match read_codex_bearer_token_env_var() {
            Some(name) => name,
            None => return (env, None),
        },
        "gemini" => "GEMINI_API_KEY".to_string(),
        _ => return (env, None),
    };

    if let Some(val) = cfg.saved_env_vars.get(&var_name) {
        if !val.is_empty() {
            env.insert(var_name, clean_env_token(val));
            return (env, None);
        }
    }
    if let Ok(val) = std::env::var(&var_name) {
        if !val.is_empty() {
            env.insert(var_name, clean_env_token(&val));
            return (env, None);
        }
    }

    (env, Some(var_name))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
