// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed session registry with advisory file locking.
//!
//! Every read and write goes through one primitive that holds an exclusive
//! lock on a sibling lock file for the whole read-modify-write cycle, so
//! mutations are strictly linearised across concurrent processes. The
//! registry itself is pretty-printed JSON so manual inspection and recovery
//! stay possible.

use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use vf_core::SessionMeta;

/// How long to keep retrying the lock before giving up.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
/// Granularity of the lock retry loop.
const LOCK_RETRY: Duration = Duration::from_millis(50);

/// Errors from registry operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse store {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("serialize store: {0}")]
    Serialize(serde_json::Error),
    #[error("acquire lock: timeout after {0:?}")]
    LockTimeout(Duration),
    #[error("store task: {0}")]
    Task(String),
    #[error("home directory not found")]
    NoHomeDir,
}

/// Persistent index of session metadata.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the default `~/.vibeflow-cli/sessions.json`.
    pub fn new() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self {
            path: home.join(".vibeflow-cli").join("sessions.json"),
        })
    }

    /// Store backed by a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored session records.
    pub fn list(&self) -> Result<Vec<SessionMeta>, StoreError> {
        self.with_lock(|sessions| sessions)
    }

    /// Record for `name`, if present.
    pub fn get(&self, name: &str) -> Result<Option<SessionMeta>, StoreError> {
        Ok(self.list()?.into_iter().find(|m| m.name == name))
    }

    /// Add a record; an existing record with the same name is replaced.
    pub fn add(&self, meta: SessionMeta) -> Result<(), StoreError> {
        self.with_lock(|sessions| {
            let mut out: Vec<SessionMeta> = sessions
                .into_iter()
                .filter(|m| m.name != meta.name)
                .collect();
            out.push(meta);
            out
        })?;
        Ok(())
    }

    /// Remove the record with the given name; no-op if absent.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.with_lock(|sessions| sessions.into_iter().filter(|m| m.name != name).collect())?;
        Ok(())
    }

    /// Retain only records whose tmux session is in `active_tmux`.
    ///
    /// Reaps sessions that died outside the tool's control; call on refresh.
    pub fn sync(&self, active_tmux: &[String]) -> Result<(), StoreError> {
        let active: HashSet<&str> = active_tmux.iter().map(String::as_str).collect();
        self.with_lock(|sessions| {
            sessions
                .into_iter()
                .filter(|m| active.contains(m.tmux_session.as_str()))
                .collect()
        })?;
        Ok(())
    }

    /// Live tmux names that have no store record (orphaned sessions).
    ///
    /// The caller reconstructs metadata for each and adds it back, making
    /// re-attachment after a crash side-effect-free for the user.
    pub fn discover(&self, live_tmux_names: &[String]) -> Result<Vec<String>, StoreError> {
        let known: HashSet<String> = self
            .list()?
            .into_iter()
            .map(|m| m.tmux_session)
            .collect();
        Ok(live_tmux_names
            .iter()
            .filter(|name| !known.contains(*name))
            .cloned()
            .collect())
    }

    /// Acquire the exclusive lock, read the registry, apply `f`, and write
    /// the result back. The lock spans the full read-modify-write.
    fn with_lock<F>(&self, f: F) -> Result<Vec<SessionMeta>, StoreError>
    where
        F: FnOnce(Vec<SessionMeta>) -> Vec<SessionMeta>,
    {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Sibling lock file: "sessions.json" → "sessions.json.lock".
        let lock_path = {
            let mut os = self.path.clone().into_os_string();
            os.push(".lock");
            PathBuf::from(os)
        };
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&lock_path)?;
        acquire_exclusive(&lock_file)?;

        let result = (|| {
            let sessions = self.read_file()?;
            let result = f(sessions);
            self.write_file(&result)?;
            Ok(result)
        })();

        let _ = lock_file.unlock();
        result
    }

    /// Read and parse the registry file; missing or empty reads as empty.
    fn read_file(&self) -> Result<Vec<SessionMeta>, StoreError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_file(&self, sessions: &[SessionMeta]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(sessions).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

/// Try to take an exclusive flock, retrying until the timeout elapses.
///
/// The retry loop sleeps the calling thread, so every operation on this
/// store is synchronous by design. Async callers must hop through
/// `spawn_blocking` rather than call into the store from a runtime worker.
fn acquire_exclusive(file: &File) -> Result<(), StoreError> {
    let deadline = Instant::now() + LOCK_TIMEOUT;
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(()),
            Err(_) if Instant::now() < deadline => std::thread::sleep(LOCK_RETRY),
            Err(_) => return Err(StoreError::LockTimeout(LOCK_TIMEOUT)),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
