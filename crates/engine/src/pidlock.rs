// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-singleton PID lock.
//!
//! At most one manager UI runs per user. The lock is a plain PID file;
//! liveness of the recorded PID is probed with signal 0, so a stale file
//! left by a crash never blocks a new instance. The mux key bindings shell
//! out to the same check to decide between detaching to the running
//! instance and launching a fresh one.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PidLockError {
    #[error("vibeflow is already running (PID: {0})")]
    AlreadyRunning(i32),
    #[error("pid lock io: {0}")]
    Io(#[from] std::io::Error),
    #[error("home directory not found")]
    NoHomeDir,
}

/// Default PID lock path (`~/.vibeflow-cli/vibeflow.pid`).
pub fn pid_lock_path() -> Result<PathBuf, PidLockError> {
    let home = dirs::home_dir().ok_or(PidLockError::NoHomeDir)?;
    Ok(home.join(".vibeflow-cli").join("vibeflow.pid"))
}

/// Write the current PID if no other live instance holds the lock.
pub fn acquire() -> Result<(), PidLockError> {
    acquire_at(&pid_lock_path()?)
}

pub fn acquire_at(path: &std::path::Path) -> Result<(), PidLockError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(pid) = read_live_pid(path) {
        return Err(PidLockError::AlreadyRunning(pid));
    }
    std::fs::write(path, std::process::id().to_string())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Remove the PID lock file; safe when it does not exist.
pub fn release() {
    if let Ok(path) = pid_lock_path() {
        let _ = std::fs::remove_file(path);
    }
}

/// PID of a live instance holding the default lock, if any.
pub fn running_instance() -> Option<i32> {
    read_live_pid(&pid_lock_path().ok()?)
}

/// Read the PID from `path` and probe it with signal 0.
fn read_live_pid(path: &std::path::Path) -> Option<i32> {
    let data = std::fs::read_to_string(path).ok()?;
    let pid: i32 = data.trim().parse().ok()?;
    if pid <= 0 {
        return None;
    }
    if process_alive(pid) {
        Some(pid)
    } else {
        None
    }
}

#[cfg(unix)]
fn process_alive(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    // Signal 0 checks existence without delivering anything.
    kill(Pid::from_raw(pid), None).is_ok()
}

#[cfg(not(unix))]
fn process_alive(_pid: i32) -> bool {
    false
}

#[cfg(test)]
#[path = "pidlock_tests.rs"]
mod tests;
