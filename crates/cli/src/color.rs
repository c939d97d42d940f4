// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::IsTerminal;

pub mod codes {
    /// Column headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
}

const RESET: &str = "\x1b[0m";

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if std::env::var("COLOR").map(|v| v == "1").unwrap_or(false) {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

/// Apply header color unconditionally (caller decides whether to use this).
pub(crate) fn apply_header(text: &str) -> String {
    format!("{}{}{}", fg256(codes::HEADER), text, RESET)
}

/// Colorize a status string based on its semantic meaning.
///
/// - Green: attached, healthy, active, running
/// - Yellow: idle, stale, recovering, external, recovered
/// - Red: dead, failed, error
/// - Default (no color): unknown states
///
/// Uses first-word matching so compound statuses like "failed: reason" are
/// colored correctly.
pub(crate) fn apply_status(text: &str) -> String {
    let lower = text.trim_start().to_lowercase();
    let first_word = lower
        .split(|c: char| !c.is_alphabetic())
        .next()
        .unwrap_or("");
    let code = match first_word {
        "attached" | "healthy" | "active" | "running" | "none" => "\x1b[32m",
        "idle" | "stale" | "recovering" | "external" | "recovered" | "detached" => "\x1b[33m",
        "dead" | "failed" | "error" => "\x1b[31m",
        _ => return text.to_string(),
    };
    format!("{code}{text}{RESET}")
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
