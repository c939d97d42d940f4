// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session naming conventions.
//!
//! All managed sessions live under a reserved name prefix so they can be
//! told apart from anything else running on the shared mux server.
//! Format: `vibeflow_{kind}-{name}`, or `vibeflow_{name}` when the agent
//! kind is empty.

/// Reserved prefix for all vibeflow-managed tmux sessions.
pub const SESSION_PREFIX: &str = "vibeflow_";

/// Compose the full tmux session name from an agent kind and short name.
pub fn full_session_name(kind: &str, name: &str) -> String {
    if kind.is_empty() {
        format!("{}{}", SESSION_PREFIX, name)
    } else {
        format!("{}{}-{}", SESSION_PREFIX, kind, name)
    }
}

/// Return `name` with the session prefix, adding it only if not already present.
pub fn ensure_prefix(name: &str) -> String {
    if name.starts_with(SESSION_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", SESSION_PREFIX, name)
    }
}

/// Extract the agent kind from a full tmux session name.
///
/// `vibeflow_{kind}-{name}` yields `Some(kind)`. Returns `None` when the
/// name carries no kind segment or lacks the reserved prefix entirely.
pub fn parse_session_kind(full: &str) -> Option<&str> {
    let rest = full.strip_prefix(SESSION_PREFIX)?;
    match rest.find('-') {
        Some(idx) if idx > 0 => Some(&rest[..idx]),
        _ => None,
    }
}

/// Strip the reserved prefix and any kind segment, yielding the short name.
///
/// `vibeflow_claude-session-x` → `session-x`; names without a kind segment
/// lose only the prefix.
pub fn short_name(full: &str) -> &str {
    let rest = full.strip_prefix(SESSION_PREFIX).unwrap_or(full);
    match parse_session_kind(full) {
        Some(kind) => rest.get(kind.len() + 1..).unwrap_or(rest),
        None => rest,
    }
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;
