// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake mux adapter for testing

use super::{CreateSessionOpts, MuxAdapter, MuxError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use vf_core::{ensure_prefix, full_session_name, MuxSession};

/// Recorded mux call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxCall {
    EnsureServer,
    Create { full_name: String, command: String },
    Attach { name: String },
    Kill { name: String },
    SendKeys { name: String, text: String },
    BindKeys { name: String },
}

#[derive(Debug, Clone)]
struct FakeSession {
    session: MuxSession,
    work_dir: String,
    capture: String,
}

struct FakeMuxState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<MuxCall>,
    next_id: u64,
}

/// Fake mux adapter for testing
#[derive(Clone)]
pub struct FakeMuxAdapter {
    inner: Arc<Mutex<FakeMuxState>>,
    supports_popup: bool,
}

impl Default for FakeMuxAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeMuxState {
                sessions: HashMap::new(),
                calls: Vec::new(),
                next_id: 0,
            })),
            supports_popup: true,
        }
    }
}

impl FakeMuxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MuxCall> {
        self.inner.lock().calls.clone()
    }

    /// Inputs sent via send_keys, in order.
    pub fn sent_keys(&self) -> Vec<(String, String)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MuxCall::SendKeys { name, text } => Some((name.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Add a pre-existing live session by full name.
    pub fn add_session(&self, full_name: &str) {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = format!("${}", inner.next_id);
        inner.sessions.insert(
            full_name.to_string(),
            FakeSession {
                session: MuxSession {
                    name: full_name.to_string(),
                    id,
                    windows: 1,
                    attached: false,
                    pane_dead: false,
                    created_at: "fake".to_string(),
                },
                work_dir: String::new(),
                capture: String::new(),
            },
        );
    }

    /// Script the pane capture for a session.
    pub fn set_capture(&self, full_name: &str, text: &str) {
        if let Some(s) = self.inner.lock().sessions.get_mut(full_name) {
            s.capture = text.to_string();
        }
    }

    /// Script the pane working directory for a session.
    pub fn set_work_dir(&self, full_name: &str, dir: &str) {
        if let Some(s) = self.inner.lock().sessions.get_mut(full_name) {
            s.work_dir = dir.to_string();
        }
    }

    /// Mark a session as attached.
    pub fn set_attached(&self, full_name: &str, attached: bool) {
        if let Some(s) = self.inner.lock().sessions.get_mut(full_name) {
            s.session.attached = attached;
        }
    }
}

#[async_trait]
impl MuxAdapter for FakeMuxAdapter {
    async fn ensure_server(&self) -> Result<(), MuxError> {
        self.inner.lock().calls.push(MuxCall::EnsureServer);
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<MuxSession>, MuxError> {
        let inner = self.inner.lock();
        let mut sessions: Vec<MuxSession> =
            inner.sessions.values().map(|s| s.session.clone()).collect();
        sessions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sessions)
    }

    async fn create_session(&self, opts: &CreateSessionOpts) -> Result<(), MuxError> {
        let full_name = full_session_name(&opts.kind, &opts.name);
        {
            let mut inner = self.inner.lock();
            inner.calls.push(MuxCall::Create {
                full_name: full_name.clone(),
                command: opts.command.clone(),
            });
            inner.sessions.remove(&full_name);
        }
        self.add_session(&full_name);
        self.set_work_dir(&full_name, &opts.work_dir.display().to_string());
        Ok(())
    }

    async fn attach(&self, name: &str) -> Result<(), MuxError> {
        let full_name = ensure_prefix(name);
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::Attach {
            name: full_name.clone(),
        });
        if !inner.sessions.contains_key(&full_name) {
            return Err(MuxError::SessionNotFound(full_name));
        }
        Ok(())
    }

    async fn kill(&self, name: &str) -> Result<(), MuxError> {
        let full_name = ensure_prefix(name);
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::Kill {
            name: full_name.clone(),
        });
        inner.sessions.remove(&full_name);
        Ok(())
    }

    async fn has_session(&self, name: &str) -> bool {
        let full_name = ensure_prefix(name);
        self.inner.lock().sessions.contains_key(&full_name)
    }

    async fn capture_pane(&self, name: &str, _lines: u32) -> Result<String, MuxError> {
        let full_name = ensure_prefix(name);
        let inner = self.inner.lock();
        match inner.sessions.get(&full_name) {
            Some(s) => Ok(s.capture.clone()),
            None => Err(MuxError::SessionNotFound(full_name)),
        }
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), MuxError> {
        if text.is_empty() {
            return Ok(());
        }
        let full_name = ensure_prefix(name);
        let mut inner = self.inner.lock();
        if !inner.sessions.contains_key(&full_name) {
            return Err(MuxError::SessionNotFound(full_name));
        }
        inner.calls.push(MuxCall::SendKeys {
            name: full_name,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn bind_session_keys(&self, name: &str, _pid_lock_path: &Path) -> Result<(), MuxError> {
        self.inner.lock().calls.push(MuxCall::BindKeys {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn pane_work_dir(&self, name: &str) -> String {
        let full_name = ensure_prefix(name);
        self.inner
            .lock()
            .sessions
            .get(&full_name)
            .map(|s| s.work_dir.clone())
            .unwrap_or_default()
    }

    fn supports_popup(&self) -> bool {
        self.supports_popup
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
