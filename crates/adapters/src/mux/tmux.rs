// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux adapter pinned to a private socket.

use super::{CreateSessionOpts, MuxAdapter, MuxError};
use crate::env::{expand_env_refs, inside_tmux};
use crate::subprocess::{combined_output, run_with_timeout, TMUX_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use vf_core::{ensure_prefix, full_session_name, MuxSession, SESSION_PREFIX};

/// Format string for `list-sessions`; fields are tab-separated.
const LIST_FORMAT: &str = "#{session_name}\t#{session_id}\t#{session_windows}\t#{session_attached}\t#{session_created_string}\t#{pane_dead}";

/// Tmux-based mux adapter.
#[derive(Clone)]
pub struct TmuxAdapter {
    socket: String,
    supports_popup: bool,
}

impl TmuxAdapter {
    /// Create an adapter on the given socket name ("vibeflow" when empty).
    /// Popup support is probed once from `tmux -V`.
    pub fn new(socket: &str) -> Self {
        let socket = if socket.is_empty() {
            "vibeflow".to_string()
        } else {
            socket.to_string()
        };
        let supports_popup = detect_popup_support();
        Self {
            socket,
            supports_popup,
        }
    }

    pub fn socket(&self) -> &str {
        &self.socket
    }

    async fn run(&self, args: &[&str]) -> Result<Output, MuxError> {
        let mut cmd = Command::new("tmux");
        cmd.arg("-L").arg(&self.socket).args(args);
        run_with_timeout(cmd, TMUX_TIMEOUT, "tmux")
            .await
            .map_err(MuxError::CommandFailed)
    }

    /// Run a tmux command, mapping non-zero exit to an error carrying the
    /// combined output.
    async fn run_checked(&self, args: &[&str]) -> Result<String, MuxError> {
        let output = self.run(args).await?;
        let combined = combined_output(&output);
        if !output.status.success() {
            return Err(MuxError::CommandFailed(format!(
                "tmux {}: {}",
                args.first().unwrap_or(&""),
                combined.trim()
            )));
        }
        Ok(combined)
    }

    async fn configure_status_bar(&self, full_name: &str, opts: &CreateSessionOpts) {
        let kind = if opts.kind.is_empty() {
            "agent"
        } else {
            &opts.kind
        };
        let branch = if opts.branch.is_empty() {
            "main"
        } else {
            &opts.branch
        };
        let project = if opts.project.is_empty() {
            "default"
        } else {
            &opts.project
        };

        let status_left = format!(
            "#[fg=#1a1b26,bg=#00d4aa,bold] vibeflow #[fg=#00d4aa,bg=#2a2e3f,nobold] {} #[fg=#555555]|#[fg=#a9b1d6] {} ",
            kind, branch
        );
        let status_right = format!(
            "#[fg=#555555]C-q:#[fg=#a9b1d6]Menu #[fg=#555555]|#[fg=#555555] C-\\:#[fg=#a9b1d6]Menu #[fg=#555555]| #[fg=#00d4aa]{} ",
            project
        );

        // Scoped per-session via set-option -t so settings don't leak to
        // other sessions on the same server. Styling failures are non-fatal.
        let settings: [(&str, &str); 6] = [
            ("status", "on"),
            ("status-style", "fg=#a9b1d6,bg=#1a1b26"),
            ("status-left", &status_left),
            ("status-right", &status_right),
            ("status-left-length", "60"),
            ("status-right-length", "60"),
        ];
        for (key, val) in settings {
            if let Err(e) = self
                .run_checked(&["set-option", "-t", full_name, key, val])
                .await
            {
                tracing::warn!(session = full_name, key, error = %e, "status bar option failed");
            }
        }
    }
}

#[async_trait]
impl MuxAdapter for TmuxAdapter {
    async fn ensure_server(&self) -> Result<(), MuxError> {
        self.run_checked(&["start-server"]).await?;
        // Server-level settings that aren't loaded from the user's tmux.conf
        // (we run on a custom socket). Clipboard and terminal passthrough
        // keep paste working inside agent panes.
        for (key, val) in [("set-clipboard", "on"), ("allow-passthrough", "on")] {
            let _ = self.run(&["set", "-s", key, val]).await;
        }
        // Keep dead panes alive so the user can see why the agent command
        // exited. Without this, sessions whose command exits immediately are
        // destroyed and disappear from the session list.
        let _ = self.run(&["set", "-g", "remain-on-exit", "on"]).await;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<MuxSession>, MuxError> {
        let output = self.run(&["list-sessions", "-F", LIST_FORMAT]).await?;
        let combined = combined_output(&output);
        if !output.status.success() {
            // tmux reports an empty server state as an error; treat it as an
            // empty result.
            if combined.contains("no server running") || combined.contains("no sessions") {
                return Ok(Vec::new());
            }
            return Err(MuxError::CommandFailed(format!(
                "list sessions: {}",
                combined.trim()
            )));
        }

        let mut sessions = Vec::new();
        for line in combined.lines() {
            let parts: Vec<&str> = line.splitn(6, '\t').collect();
            if parts.len() < 5 {
                continue;
            }
            let name = parts[0];
            if !name.starts_with(SESSION_PREFIX) {
                continue;
            }
            sessions.push(MuxSession {
                name: name.to_string(),
                id: parts[1].to_string(),
                windows: parts[2].parse().unwrap_or(0),
                attached: parts[3] == "1",
                created_at: parts[4].to_string(),
                pane_dead: parts.len() >= 6 && parts[5] == "1",
            });
        }
        Ok(sessions)
    }

    async fn create_session(&self, opts: &CreateSessionOpts) -> Result<(), MuxError> {
        let full_name = full_session_name(&opts.kind, &opts.name);

        // A stale session may be holding the name (e.g. a previous attempt
        // that reused the same marker id). Kill it before creating fresh.
        if self.has_session(&full_name).await {
            tracing::warn!(session = %full_name, "session already exists, killing first");
            let _ = self.run(&["kill-session", "-t", &full_name]).await;
        }

        let work_dir = opts.work_dir.display().to_string();
        let mut args: Vec<String> = vec![
            "new-session".into(),
            "-d".into(),
            "-s".into(),
            full_name.clone(),
            "-c".into(),
            work_dir,
        ];
        for (key, value) in &opts.env {
            args.push("-e".into());
            args.push(format!("{}={}", key, expand_env_refs(value)));
        }
        if !opts.command.is_empty() {
            args.push(opts.command.clone());
        }

        let spawn_line = format!("tmux -L {} {}", self.socket, redact_args(&args).join(" "));
        tracing::debug!(session = %full_name, kind = %opts.kind, command = %spawn_line, "spawning session");
        tracing::info!(
            session = %full_name,
            kind = %opts.kind,
            work_dir = %opts.work_dir.display(),
            launch = %opts.command,
            "create session"
        );

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run(&arg_refs).await?;
        if !output.status.success() {
            return Err(MuxError::CreateFailed {
                name: full_name,
                detail: combined_output(&output).trim().to_string(),
            });
        }

        // Per-session as well as globally in ensure_server: the global
        // setting is lost when the server restarts with no prior sessions.
        let _ = self
            .run(&["set-option", "-t", &full_name, "remain-on-exit", "on"])
            .await;

        self.configure_status_bar(&full_name, opts).await;
        Ok(())
    }

    async fn attach(&self, name: &str) -> Result<(), MuxError> {
        let full_name = ensure_prefix(name);
        // Nested clients aren't allowed; switch the current client instead.
        let subcommand = if inside_tmux() {
            "switch-client"
        } else {
            "attach-session"
        };
        let mut cmd = Command::new("tmux");
        cmd.arg("-L")
            .arg(&self.socket)
            .arg(subcommand)
            .arg("-t")
            .arg(&full_name)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let status = cmd
            .status()
            .await
            .map_err(|e| MuxError::CommandFailed(format!("attach {}: {}", full_name, e)))?;
        if !status.success() {
            return Err(MuxError::CommandFailed(format!(
                "attach {}: exited with {}",
                full_name, status
            )));
        }
        Ok(())
    }

    async fn kill(&self, name: &str) -> Result<(), MuxError> {
        let full_name = ensure_prefix(name);
        let output = self.run(&["kill-session", "-t", &full_name]).await?;
        if !output.status.success() {
            let combined = combined_output(&output);
            // The session may already be gone; that is not a failure.
            if !combined.contains("can't find session") && !combined.contains("no server running") {
                return Err(MuxError::CommandFailed(format!(
                    "kill {}: {}",
                    full_name,
                    combined.trim()
                )));
            }
        }
        Ok(())
    }

    async fn has_session(&self, name: &str) -> bool {
        let full_name = ensure_prefix(name);
        match self.run(&["has-session", "-t", &full_name]).await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, MuxError> {
        let full_name = ensure_prefix(name);
        let start = format!("-{}", lines);
        let out = self
            .run_checked(&["capture-pane", "-p", "-t", &full_name, "-S", &start])
            .await
            .map_err(|e| MuxError::CommandFailed(format!("capture-pane {}: {}", full_name, e)))?;
        Ok(out.trim_end_matches('\n').to_string())
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), MuxError> {
        if text.is_empty() {
            return Ok(());
        }
        let full_name = ensure_prefix(name);
        if !self.has_session(&full_name).await {
            return Err(MuxError::SessionNotFound(full_name));
        }
        self.run_checked(&["send-keys", "-t", &full_name, text, "Enter"])
            .await
            .map_err(|e| MuxError::CommandFailed(format!("send-keys {}: {}", full_name, e)))?;
        Ok(())
    }

    async fn bind_session_keys(&self, name: &str, pid_lock_path: &Path) -> Result<(), MuxError> {
        let bin = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "vibeflow".to_string());

        // Shell condition: another manager instance holds the PID lock and
        // its process is alive. Keep the quoting simple; tmux's if-shell
        // argument parsing is unforgiving.
        let pid_path = pid_lock_path.display();
        let pid_check = format!(
            "test -f {} && kill -0 $(cat {}) 2>/dev/null",
            pid_path, pid_path
        );

        // Both C-q and C-\ map to the same toggle for reliability.
        for key in ["C-q", "C-\\"] {
            let launch_cmd = if self.supports_popup {
                // display-popup overlays the current pane and works even when
                // the agent has the terminal in raw mode. -E closes the popup
                // when the command exits.
                format!("display-popup -E -w 90% -h 90% {}", bin)
            } else {
                // tmux < 3.2: open a new window instead.
                format!("new-window -t {} {}", name, bin)
            };

            // When the manager is running, detach-client returns the
            // terminal to it (it is blocked on attach). Otherwise launch a
            // fresh instance.
            self.run_checked(&[
                "bind-key",
                "-T",
                "root",
                key,
                "if-shell",
                &pid_check,
                "detach-client",
                &launch_cmd,
            ])
            .await
            .map_err(|e| MuxError::CommandFailed(format!("bind {} for {}: {}", key, name, e)))?;
        }

        // C-d detaches cleanly; agent sessions keep running detached.
        self.run_checked(&["bind-key", "-T", "root", "C-d", "detach-client"])
            .await
            .map_err(|e| MuxError::CommandFailed(format!("bind C-d for {}: {}", name, e)))?;
        Ok(())
    }

    async fn pane_work_dir(&self, name: &str) -> String {
        let full_name = ensure_prefix(name);
        match self
            .run_checked(&["display-message", "-t", &full_name, "-p", "#{pane_current_path}"])
            .await
        {
            Ok(out) => out.trim().to_string(),
            Err(_) => String::new(),
        }
    }

    fn supports_popup(&self) -> bool {
        self.supports_popup
    }
}

/// Redact token-bearing `-e KEY=VALUE` arguments before logging.
fn redact_args(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|a| match a.split_once('=') {
            Some((key, _))
                if key.ends_with("_TOKEN") || key.ends_with("_KEY") || key.ends_with("_SECRET") =>
            {
                format!("{}=<redacted>", key)
            }
            _ => a.clone(),
        })
        .collect()
}

/// Whether the installed tmux supports `display-popup` (tmux >= 3.2).
fn detect_popup_support() -> bool {
    let output = std::process::Command::new("tmux").arg("-V").output();
    match output {
        Ok(out) => parse_version(&String::from_utf8_lossy(&out.stdout))
            .map(|(major, minor)| major > 3 || (major == 3 && minor >= 2))
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Parse `tmux -V` output into (major, minor).
///
/// Handles "tmux 3.4", "tmux next-3.5", and minor suffixes like "2a".
fn parse_version(raw: &str) -> Option<(u32, u32)> {
    let version = raw
        .trim()
        .trim_start_matches("tmux ")
        .trim_start_matches("next-");
    let (major_str, minor_str) = version.split_once('.')?;
    let major: u32 = major_str.parse().ok()?;
    let digits: String = minor_str.chars().take_while(|c| c.is_ascii_digit()).collect();
    let minor: u32 = digits.parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
