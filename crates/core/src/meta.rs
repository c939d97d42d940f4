// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session metadata records.
//!
//! [`SessionMeta`] is the persistent record the registry stores for each
//! managed session: everything tmux alone cannot remember (agent kind,
//! worktree path, server session id). [`MuxSession`] is the live view
//! reported by the multiplexer and is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistent metadata for one managed session. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Short session name (a session id without the tmux prefix).
    pub name: String,
    /// Full tmux session name, unique across the registry.
    pub tmux_session: String,
    /// Agent kind key (e.g. "claude", "codex", "gemini").
    pub provider: String,
    /// Project label for display and server registration.
    #[serde(default)]
    pub project: String,
    /// Role label scoping the marker file; empty for vanilla sessions.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub persona: String,
    /// Git branch the session was launched on.
    pub branch: String,
    /// Worktree path, when the session runs in a dedicated worktree.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub worktree_path: String,
    /// Working directory of the agent.
    pub working_dir: String,
    /// Session id issued by the management server, when integrated.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vibeflow_session_id: String,
    pub created_at: DateTime<Utc>,
}

/// A live tmux session as reported by `list-sessions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxSession {
    /// Full session name, including the reserved prefix.
    pub name: String,
    /// Multiplexer-assigned id (e.g. "$3").
    pub id: String,
    pub windows: u32,
    pub attached: bool,
    /// True when the initial pane's command has exited (remain-on-exit).
    pub pane_dead: bool,
    /// Creation timestamp as formatted by the multiplexer.
    pub created_at: String,
}
