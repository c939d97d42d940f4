// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error-pattern registry.
//!
//! Known failure signatures from agent output, keyed by agent kind with a
//! `"*"` universal bucket. Matching is first-hit-wins over a stable order,
//! so specific patterns (overloaded, rate-limit) sit before the broader
//! 5xx pattern that would otherwise subsume them and lose the backoff flag.

use regex::Regex;

/// How a matched error should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Can be retried automatically via a recovery message.
    Recoverable,
    /// Unrecoverable; the session is marked failed and left alone.
    Fatal,
}

/// A known error signature from an agent.
#[derive(Debug, Clone)]
pub struct ErrorPattern {
    /// Agent kind key ("claude", "codex", "gemini") or "*" for universal.
    pub kind: String,
    pub regex: Regex,
    pub severity: Severity,
    /// Text injected via send-keys for recovery; empty for fatal patterns.
    pub recovery_message: String,
    /// True for rate-limit-shaped errors that need exponential backoff.
    pub requires_backoff: bool,
    pub description: String,
}

/// Ordered collection of error patterns.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<ErrorPattern>,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry {
    /// Registry preloaded with the built-in patterns.
    pub fn new() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }

    /// First pattern matching `output` for the given agent kind.
    ///
    /// Universal patterns apply to every kind. Pure: same inputs always
    /// yield the same entry.
    pub fn match_output(&self, kind: &str, output: &str) -> Option<&ErrorPattern> {
        self.patterns
            .iter()
            .filter(|p| p.kind == "*" || p.kind == kind)
            .find(|p| p.regex.is_match(output))
    }

    /// Append a custom pattern at runtime.
    pub fn add_pattern(&mut self, pattern: ErrorPattern) {
        self.patterns.push(pattern);
    }
}

#[allow(clippy::expect_used)]
fn pattern(
    kind: &str,
    regex: &str,
    severity: Severity,
    recovery_message: &str,
    requires_backoff: bool,
    description: &str,
) -> ErrorPattern {
    ErrorPattern {
        kind: kind.to_string(),
        regex: Regex::new(regex).expect("constant regex pattern is valid"),
        severity,
        recovery_message: recovery_message.to_string(),
        requires_backoff,
        description: description.to_string(),
    }
}

/// Built-in error patterns for the supported agents.
///
/// Ordering matters: 529 and 429 precede the generic 5xx signature so their
/// backoff behaviour wins the tie-break.
pub fn default_patterns() -> Vec<ErrorPattern> {
    vec![
        // --- Claude Code ---
        pattern(
            "claude",
            r"API Error:\s*529",
            Severity::Recoverable,
            "The API is overloaded. Please wait a moment and retry the last operation.",
            true,
            "Claude API overloaded (529)",
        ),
        pattern(
            "claude",
            r"API Error:\s*429",
            Severity::Recoverable,
            "Rate limit hit. Please wait and retry the last operation.",
            true,
            "Claude API rate limit (429)",
        ),
        pattern(
            "claude",
            r"API Error:\s*5\d{2}",
            Severity::Recoverable,
            "The previous API call failed with a server error. Please retry the last operation.",
            false,
            "Claude API 5xx server error",
        ),
        pattern(
            "claude",
            r"(?i)connection\s+refused",
            Severity::Recoverable,
            "Connection was refused. Please retry the last operation.",
            true,
            "Claude connection refused",
        ),
        pattern(
            "claude",
            r"(?i)\bETIMEDOUT\b|\btimed?\s*out\b",
            Severity::Recoverable,
            "The request timed out. Please retry the last operation.",
            true,
            "Claude connection timeout",
        ),
        // --- OpenAI Codex CLI ---
        pattern(
            "codex",
            r"(?i)OpenAI\s+API\s+error",
            Severity::Recoverable,
            "The OpenAI API returned an error. Please retry the last operation.",
            false,
            "Codex API error",
        ),
        pattern(
            "codex",
            r"(?i)rate\s+limit\s+exceeded",
            Severity::Recoverable,
            "Rate limit exceeded. Please wait and retry the last operation.",
            true,
            "Codex rate limit",
        ),
        // --- Google Gemini CLI ---
        pattern(
            "gemini",
            r"RESOURCE_EXHAUSTED",
            Severity::Recoverable,
            "Gemini resource quota exhausted. Please wait and retry the last operation.",
            true,
            "Gemini resource exhausted",
        ),
        pattern(
            "gemini",
            r"(?i)INTERNAL\s+server\s+error|google\.api.*INTERNAL",
            Severity::Recoverable,
            "Gemini internal server error. Please retry the last operation.",
            false,
            "Gemini internal error",
        ),
        // --- Universal (all agents) ---
        // (?m): the scanned text is a multi-line tail of the pane buffer.
        pattern(
            "*",
            r"(?m)^panic:",
            Severity::Fatal,
            "",
            false,
            "Runtime panic (fatal)",
        ),
        pattern(
            "*",
            r"(?m)^fatal error:",
            Severity::Fatal,
            "",
            false,
            "Fatal error (fatal)",
        ),
    ]
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
