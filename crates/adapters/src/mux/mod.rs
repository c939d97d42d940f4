// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-multiplexer adapters.
//!
//! Everything the tool knows about tmux goes through [`MuxAdapter`]. The
//! production implementation is [`TmuxAdapter`], pinned to a private socket
//! so managed sessions never leak into the user's default tmux namespace.

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMuxAdapter, MuxCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vf_core::MuxSession;

/// Errors from mux operations.
///
/// Command failures carry the combined stdout/stderr of the underlying
/// invocation, since tmux reports diagnostics on either stream.
#[derive(Debug, Error)]
pub enum MuxError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("create session {name}: {detail}")]
    CreateFailed { name: String, detail: String },
    #[error("{0}")]
    CommandFailed(String),
}

/// Parameters for creating an agent session.
#[derive(Debug, Clone, Default)]
pub struct CreateSessionOpts {
    /// Short session name (without the reserved prefix).
    pub name: String,
    /// Agent kind key (e.g. "claude"); empty for kind-less sessions.
    pub kind: String,
    /// Working directory for the initial window.
    pub work_dir: PathBuf,
    /// Resolved launch command; empty spawns the default shell.
    pub command: String,
    /// Environment entries passed via `-e`. `${VAR}` references in values
    /// are expanded from the ambient environment at spawn time.
    pub env: Vec<(String, String)>,
    /// Branch shown in the status bar.
    pub branch: String,
    /// Project label shown in the status bar.
    pub project: String,
}

/// Single point of contact with the terminal multiplexer.
#[async_trait]
pub trait MuxAdapter: Clone + Send + Sync + 'static {
    /// Start the mux server on the private socket if not already running.
    /// Idempotent; also applies server-scoped options.
    async fn ensure_server(&self) -> Result<(), MuxError>;

    /// List live sessions carrying the reserved name prefix. An empty
    /// multiplexer state ("no server running", "no sessions") yields an
    /// empty vec, not an error.
    async fn list_sessions(&self) -> Result<Vec<MuxSession>, MuxError>;

    /// Create a detached session. A stale session with the same full name
    /// is killed first.
    async fn create_session(&self, opts: &CreateSessionOpts) -> Result<(), MuxError>;

    /// Attach the current terminal to a session; blocks until the client
    /// exits. Inside an existing mux client this switches the client
    /// instead of nesting.
    async fn attach(&self, name: &str) -> Result<(), MuxError>;

    /// Kill a session. Killing a missing session is non-fatal.
    async fn kill(&self, name: &str) -> Result<(), MuxError>;

    async fn has_session(&self, name: &str) -> bool;

    /// Last `lines` lines of the active pane, trailing newlines trimmed.
    /// Callers are responsible for ANSI stripping.
    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, MuxError>;

    /// Send `text` followed by a synthesised Enter keystroke. Empty text is
    /// a no-op. The session must exist.
    async fn send_keys(&self, name: &str, text: &str) -> Result<(), MuxError>;

    /// Install the root-table key bindings that toggle between an agent
    /// session and the manager UI. `pid_lock_path` is the singleton lock
    /// consulted to decide between detaching and launching a new instance.
    async fn bind_session_keys(&self, name: &str, pid_lock_path: &Path) -> Result<(), MuxError>;

    /// Re-apply key bindings so they survive mux configuration reloads.
    /// Bindings are global to the server, so one live session suffices.
    async fn bind_all_session_keys(&self, pid_lock_path: &Path) {
        if let Ok(sessions) = self.list_sessions().await {
            if let Some(first) = sessions.first() {
                let _ = self.bind_session_keys(&first.name, pid_lock_path).await;
            }
        }
    }

    /// Find a live session whose full name contains `id` as a substring.
    async fn find_session_by_session_id(&self, id: &str) -> Option<String> {
        let sessions = self.list_sessions().await.ok()?;
        sessions
            .into_iter()
            .map(|s| s.name)
            .find(|name| name.contains(id))
    }

    /// Current working directory of a session's active pane; empty string
    /// when unavailable. Used to reconstruct metadata for discovered
    /// sessions.
    async fn pane_work_dir(&self, name: &str) -> String;

    /// Whether the mux supports overlay popups (tmux >= 3.2).
    fn supports_popup(&self) -> bool;
}
