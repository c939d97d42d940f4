// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-level session conflict detection.
//!
//! Each work directory carries a persona-scoped marker file recording the
//! session id that owns it. Checking a directory classifies the marker as
//! none / active / stale / external so the launch path can surface the
//! right resolution options instead of trampling a live agent.
//!
//! Marker grammar (newline-terminated lines):
//!
//! ```text
//! session-YYYYMMDD-HHMMSS-XXXXXXXX
//! [provider=<kind>]
//! [tmux_session=<full mux name>]
//! [persona=<key>]
//! ```

use std::path::{Path, PathBuf};
use vf_adapters::MuxAdapter;
use vf_core::parse_session_kind;

/// Base marker file name; persona-scoped markers append `-{persona}`.
pub const MARKER_FILE_NAME: &str = ".vibeflow-session";

/// Outcome of a conflict check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStatus {
    /// No marker file found.
    None,
    /// Marker exists and its tmux session is still running.
    Active,
    /// Marker exists but the tmux session is gone.
    Stale,
    /// Marker exists with no mux binding and no mux adapter was available
    /// to scan; likely written by a vanilla agent run outside this tool.
    External,
}

impl std::fmt::Display for ConflictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConflictStatus::None => "none",
            ConflictStatus::Active => "active",
            ConflictStatus::Stale => "stale",
            ConflictStatus::External => "external",
        };
        f.write_str(s)
    }
}

/// Result of a conflict check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictResult {
    pub status: ConflictStatus,
    /// Session id from the marker file.
    pub session_id: String,
    /// Persona the marker is scoped to (derived from the file name).
    pub persona: String,
    /// Agent kind; parsed from the marker or the bound tmux name,
    /// defaulting to "claude".
    pub provider: String,
    /// Full tmux session name, when a binding was established.
    pub tmux_session: String,
    /// Absolute path of the marker file.
    pub file_path: PathBuf,
}

impl ConflictResult {
    fn none() -> Self {
        Self {
            status: ConflictStatus::None,
            session_id: String::new(),
            persona: String::new(),
            provider: String::new(),
            tmux_session: String::new(),
            file_path: PathBuf::new(),
        }
    }
}

/// Marker file name for a persona: `.vibeflow-session` when empty,
/// `.vibeflow-session-{persona}` otherwise.
pub fn marker_file_name(persona: &str) -> String {
    if persona.is_empty() {
        MARKER_FILE_NAME.to_string()
    } else {
        format!("{}-{}", MARKER_FILE_NAME, persona)
    }
}

/// Check whether another session is actively using `dir` under `persona`.
///
/// Side-effect-free: the caller decides how to handle the result. Passing
/// no mux adapter means liveness cannot be established; markers then
/// classify as external (vanilla agent territory).
pub async fn check<M: MuxAdapter>(
    dir: &Path,
    persona: &str,
    mux: Option<&M>,
) -> ConflictResult {
    let file_path = dir.join(marker_file_name(persona));

    let Ok(data) = std::fs::read_to_string(&file_path) else {
        return ConflictResult::none();
    };
    let content = data.trim();
    if content.is_empty() {
        return ConflictResult::none();
    }
    let Some(parsed) = parse_marker(content) else {
        return ConflictResult::none();
    };

    let mut result = ConflictResult {
        status: ConflictStatus::None,
        session_id: parsed.session_id,
        persona: persona.to_string(),
        provider: parsed.provider,
        tmux_session: parsed.tmux_session,
        file_path,
    };

    let Some(mux) = mux else {
        // No way to establish liveness; the marker likely belongs to a
        // vanilla agent launched outside this tool.
        result.status = ConflictStatus::External;
        return result;
    };

    // An explicit tmux_session= binding is trusted as-is. Otherwise scan
    // live sessions for one whose name contains this session id.
    if result.tmux_session.is_empty() {
        if let Some(found) = mux.find_session_by_session_id(&result.session_id).await {
            if let Some(kind) = parse_session_kind(&found) {
                result.provider = kind.to_string();
            }
            result.tmux_session = found;
        }
    }

    if !result.tmux_session.is_empty() && mux.has_session(&result.tmux_session).await {
        result.status = ConflictStatus::Active;
    } else {
        // Scanning succeeded but no live session carries this id: the
        // session genuinely vanished.
        result.status = ConflictStatus::Stale;
    }
    result
}

/// Check every persona-scoped marker in `dir`, one result per persona.
///
/// Lets the UI display coexisting multi-persona sessions in one repo
/// without forcing them to conflict. Results are ordered by persona.
pub async fn check_all_sessions<M: MuxAdapter>(dir: &Path, mux: Option<&M>) -> Vec<ConflictResult> {
    let mut personas = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name == MARKER_FILE_NAME {
            personas.push(String::new());
        } else if let Some(persona) = name.strip_prefix(&format!("{}-", MARKER_FILE_NAME)) {
            if !persona.is_empty() {
                personas.push(persona.to_string());
            }
        }
    }
    personas.sort_unstable();

    let mut results = Vec::with_capacity(personas.len());
    for persona in personas {
        let result = check(dir, &persona, mux).await;
        if result.status != ConflictStatus::None {
            results.push(result);
        }
    }
    results
}

struct ParsedMarker {
    session_id: String,
    provider: String,
    tmux_session: String,
}

/// Parse marker content. The first non-empty line must carry the session
/// id; later `key=value` lines are recognised for provider and
/// tmux_session. Provider defaults to "claude" for backwards compatibility.
fn parse_marker(content: &str) -> Option<ParsedMarker> {
    let mut lines = content.lines();
    let session_id = lines.next()?.trim();
    if !session_id.starts_with("session-") {
        return None;
    }

    let mut provider = "claude".to_string();
    let mut tmux_session = String::new();
    for line in lines {
        let kv = line.trim();
        if let Some(v) = kv.strip_prefix("provider=") {
            if !v.is_empty() {
                provider = v.to_string();
            }
        } else if let Some(v) = kv.strip_prefix("tmux_session=") {
            if !v.is_empty() {
                tmux_session = v.to_string();
            }
        }
    }

    Some(ParsedMarker {
        session_id: session_id.to_string(),
        provider,
        tmux_session,
    })
}

/// Read the marker's session id without classifying. Used by the launch
/// path to reuse an existing server session id.
pub fn read_marker_id(dir: &Path, persona: &str) -> Option<String> {
    let data = std::fs::read_to_string(dir.join(marker_file_name(persona))).ok()?;
    let content = data.trim();
    if content.is_empty() {
        return None;
    }
    parse_marker(content).map(|p| p.session_id)
}

/// Write the marker with the bare session id, mode 0600.
///
/// Agents read this file to obtain their session id, so no extra metadata
/// is stored.
pub fn write_marker(dir: &Path, persona: &str, session_id: &str) -> std::io::Result<()> {
    let path = dir.join(marker_file_name(persona));
    std::fs::write(&path, format!("{}\n", session_id))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Write the marker only when it does not already carry `session_id`,
/// avoiding overwrites that could race a reading agent.
pub fn write_marker_if_needed(
    dir: &Path,
    persona: &str,
    session_id: &str,
) -> std::io::Result<()> {
    if read_marker_id(dir, persona).as_deref() == Some(session_id) {
        return Ok(());
    }
    write_marker(dir, persona, session_id)
}

/// Remove the marker file; errors if it does not exist.
/// Call after confirming the session is stale.
pub fn cleanup_marker(dir: &Path, persona: &str) -> std::io::Result<()> {
    std::fs::remove_file(dir.join(marker_file_name(persona)))
}

/// Remove the marker file, tolerating a missing file.
pub fn remove_marker(dir: &Path, persona: &str) {
    let _ = std::fs::remove_file(dir.join(marker_file_name(persona)));
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
