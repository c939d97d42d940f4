// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session health tracking and auto-recovery.
//!
//! The monitor consumes periodic pane captures, classifies them against the
//! pattern registry, and drives a four-state machine per session:
//! healthy → error_detected → recovering → failed. Recovery is debounced,
//! suppressed while a human is attached, backed off exponentially, and
//! capped; `failed` is terminal until a manual reset.
//!
//! Scraping stdout is the only observable channel into an opaque agent, so
//! only the last few captured lines are scanned, so error strings quoted in
//! code or chat earlier in scrollback must not trigger recovery.

use crate::config::ErrorRecoveryConfig;
use crate::patterns::{ErrorPattern, PatternRegistry, Severity};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use vf_adapters::{MuxAdapter, MuxError};
use vf_core::Clock;

/// How many trailing lines of a capture are scanned for error signatures.
const SCAN_LINES: usize = 10;

/// Base delay before the second recovery attempt.
const BACKOFF_BASE_SECS: i64 = 30;

/// Health state of one monitored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// Error matched but debouncing before recovery.
    ErrorDetected,
    /// Recovery message sent, waiting for effect.
    Recovering,
    /// Fatal error or retries exhausted; manual intervention needed.
    Failed,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::ErrorDetected => "error_detected",
            HealthStatus::Recovering => "recovering",
            HealthStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Health and recovery state for a single session.
#[derive(Debug, Clone)]
pub struct SessionHealth {
    pub session_name: String,
    pub kind: String,
    pub status: HealthStatus,
    pub last_error_at: Option<DateTime<Utc>>,
    pub matched_pattern: Option<ErrorPattern>,
    pub recovery_count: u32,
    pub last_recovery_at: Option<DateTime<Utc>>,
    pub backoff_until: Option<DateTime<Utc>>,
    /// Previous capture, for change detection.
    pub last_output: String,
}

impl SessionHealth {
    fn new(session_name: &str, kind: &str) -> Self {
        Self {
            session_name: session_name.to_string(),
            kind: kind.to_string(),
            status: HealthStatus::Healthy,
            last_error_at: None,
            matched_pattern: None,
            recovery_count: 0,
            last_recovery_at: None,
            backoff_until: None,
            last_output: String::new(),
        }
    }
}

/// Health monitor for all live sessions.
///
/// Single-writer: only ever mutated from the UI's event-dispatch task in
/// response to capture delivery.
pub struct HealthMonitor<C: Clock> {
    sessions: HashMap<String, SessionHealth>,
    registry: PatternRegistry,
    config: ErrorRecoveryConfig,
    clock: C,
}

impl<C: Clock> HealthMonitor<C> {
    pub fn new(registry: PatternRegistry, config: ErrorRecoveryConfig, clock: C) -> Self {
        Self {
            sessions: HashMap::new(),
            registry,
            config,
            clock,
        }
    }

    /// Scan captured pane output and update health state.
    ///
    /// Returns true when the caller should invoke [`attempt_recovery`].
    /// Only the last [`SCAN_LINES`] lines are checked.
    ///
    /// [`attempt_recovery`]: HealthMonitor::attempt_recovery
    pub fn check_output(
        &mut self,
        session_name: &str,
        kind: &str,
        output: &str,
        is_attached: bool,
    ) -> bool {
        if !self.config.enabled {
            return false;
        }

        let now = self.clock.now();
        let max_retries = self.config.max_retries;
        let debounce = ChronoDuration::seconds(self.config.debounce_seconds as i64);

        let sh = self
            .sessions
            .entry(session_name.to_string())
            .or_insert_with(|| SessionHealth::new(session_name, kind));

        // Failed is sticky; manual reset only.
        if sh.status == HealthStatus::Failed {
            return false;
        }

        let tail = last_n_lines(output, SCAN_LINES);
        let matched = self.registry.match_output(kind, tail).cloned();

        let Some(matched) = matched else {
            // No error. If we were mid-incident, the issue resolved itself.
            if sh.status == HealthStatus::ErrorDetected || sh.status == HealthStatus::Recovering {
                tracing::info!(session = session_name, was = %sh.status, "session recovered");
                sh.status = HealthStatus::Healthy;
                sh.recovery_count = 0;
                sh.matched_pattern = None;
            }
            sh.last_output = output.to_string();
            return false;
        };

        if matched.severity == Severity::Fatal {
            tracing::warn!(
                session = session_name,
                error = %matched.description,
                "fatal error detected"
            );
            sh.status = HealthStatus::Failed;
            sh.matched_pattern = Some(matched);
            sh.last_error_at = Some(now);
            return false;
        }

        match sh.status {
            HealthStatus::Healthy => {
                // First detection: start the debounce window.
                tracing::info!(
                    session = session_name,
                    error = %matched.description,
                    "error detected, debouncing"
                );
                sh.status = HealthStatus::ErrorDetected;
                sh.last_error_at = Some(now);
                sh.matched_pattern = Some(matched);
                sh.last_output = output.to_string();
                false
            }
            HealthStatus::ErrorDetected => {
                if let Some(first_seen) = sh.last_error_at {
                    if now - first_seen < debounce {
                        return false;
                    }
                }
                if output != sh.last_output {
                    // Still producing text; the error line may scroll away
                    // on its own. Restart the debounce.
                    sh.last_error_at = Some(now);
                    sh.last_output = output.to_string();
                    return false;
                }
                if is_attached {
                    // A human is watching the pane; never inject under them.
                    return false;
                }
                should_recover(sh, max_retries)
            }
            HealthStatus::Recovering => {
                if let Some(until) = sh.backoff_until {
                    if now < until {
                        return false;
                    }
                }
                if output == sh.last_output {
                    // Recovery keystrokes did not visibly advance the agent.
                    if is_attached {
                        return false;
                    }
                    return should_recover(sh, max_retries);
                }
                // Output changed: maybe recovering on its own. Fresh debounce.
                sh.status = HealthStatus::ErrorDetected;
                sh.last_error_at = Some(now);
                sh.last_output = output.to_string();
                false
            }
            HealthStatus::Failed => false,
        }
    }

    /// Send the matched pattern's recovery message into the session.
    ///
    /// On success the state moves to `recovering` with exponential backoff;
    /// hitting the retry cap moves it straight to `failed`.
    pub async fn attempt_recovery<M: MuxAdapter>(
        &mut self,
        session_name: &str,
        mux: &M,
    ) -> Result<(), MuxError> {
        let now = self.clock.now();
        let max_retries = self.config.max_retries;
        let multiplier = i64::from(match self.config.backoff_multiplier {
            0 => 2,
            m => m,
        });

        let Some(sh) = self.sessions.get_mut(session_name) else {
            return Ok(());
        };
        let Some(message) = sh
            .matched_pattern
            .as_ref()
            .map(|p| p.recovery_message.clone())
            .filter(|m| !m.is_empty())
        else {
            return Ok(());
        };

        tracing::info!(
            session = session_name,
            attempt = sh.recovery_count + 1,
            max = max_retries,
            "sending recovery message"
        );

        if let Err(e) = mux.send_keys(session_name, &message).await {
            tracing::error!(session = session_name, error = %e, "recovery send-keys failed");
            return Err(e);
        }

        sh.recovery_count += 1;
        sh.last_recovery_at = Some(now);
        sh.status = HealthStatus::Recovering;

        let mut backoff = ChronoDuration::seconds(BACKOFF_BASE_SECS);
        for _ in 1..sh.recovery_count {
            backoff = backoff * multiplier as i32;
        }
        sh.backoff_until = Some(now + backoff);

        if sh.recovery_count >= max_retries {
            tracing::warn!(
                session = session_name,
                attempts = sh.recovery_count,
                "recovery retries exhausted"
            );
            sh.status = HealthStatus::Failed;
        }

        Ok(())
    }

    /// Return a session to `healthy` with zeroed counters (manual retry).
    pub fn reset(&mut self, session_name: &str) {
        if let Some(sh) = self.sessions.get_mut(session_name) {
            sh.status = HealthStatus::Healthy;
            sh.recovery_count = 0;
            sh.matched_pattern = None;
            sh.backoff_until = None;
        }
    }

    /// Read-only snapshot for a session, if tracked.
    pub fn health(&self, session_name: &str) -> Option<&SessionHealth> {
        self.sessions.get(session_name)
    }

    /// Drop tracking for a killed session.
    pub fn remove(&mut self, session_name: &str) {
        self.sessions.remove(session_name);
    }
}

fn should_recover(sh: &mut SessionHealth, max_retries: u32) -> bool {
    if sh.recovery_count >= max_retries {
        tracing::warn!(
            session = %sh.session_name,
            max_retries,
            "max retries reached"
        );
        sh.status = HealthStatus::Failed;
        return false;
    }
    true
}

fn last_n_lines(s: &str, n: usize) -> &str {
    let line_count = s.lines().count();
    if line_count <= n {
        return s;
    }
    // Byte offset of the (count - n)-th line.
    let mut remaining = line_count - n;
    let mut offset = 0;
    for (idx, b) in s.bytes().enumerate() {
        if b == b'\n' {
            remaining -= 1;
            if remaining == 0 {
                offset = idx + 1;
                break;
            }
        }
    }
    &s[offset..]
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
