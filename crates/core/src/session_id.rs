// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier generation and validation.
//!
//! A session id names one managed agent session and doubles as the suffix of
//! its tmux session name. Format: `session-YYYYMMDD-HHMMSS-XXXXXXXX` where
//! the last field is eight lowercase hex digits from a cryptographic RNG.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use regex::Regex;
use std::sync::LazyLock;

/// Grammar for a well-formed session id.
#[allow(clippy::expect_used)]
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^session-\d{8}-\d{6}-[0-9a-f]{8}$").expect("constant regex pattern is valid")
});

/// Generate a fresh session id.
///
/// Each call produces a new id so that multiple sessions in the same working
/// directory get distinct tmux names. Reuse of an existing id (e.g. from a
/// marker file) is the caller's decision, not this function's.
pub fn generate() -> String {
    let mut buf = [0u8; 4];
    OsRng.fill_bytes(&mut buf);
    format!(
        "session-{}-{:08x}",
        Utc::now().format("%Y%m%d-%H%M%S"),
        u32::from_be_bytes(buf)
    )
}

/// Whether `id` matches the session-id grammar.
pub fn is_valid(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

#[cfg(test)]
#[path = "session_id_tests.rs"]
mod tests;
