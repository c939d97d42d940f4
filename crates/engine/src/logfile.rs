// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotating log-file writer for the tracing subscriber.
//!
//! The log lives at `~/.vibeflow-cli/vibeflow-cli.log` and is rotated by
//! truncation once it reaches 1 MiB: enough history to debug a session,
//! bounded enough to never need external rotation.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Rotate (truncate) once the file reaches this size.
const MAX_LOG_SIZE: u64 = 1 << 20;

struct LogFileState {
    path: PathBuf,
    file: Option<File>,
}

/// Shared log-file writer; clones append to the same file.
///
/// Logging is best-effort: any I/O failure turns the writer into a no-op
/// rather than disturbing the UI.
#[derive(Clone)]
pub struct LogFile {
    inner: Arc<Mutex<LogFileState>>,
}

impl LogFile {
    /// Open (or create) the log at the default path under `~/.vibeflow-cli/`.
    pub fn open_default() -> Self {
        match dirs::home_dir() {
            Some(home) => Self::open(&home.join(".vibeflow-cli").join("vibeflow-cli.log")),
            None => Self::disabled(),
        }
    }

    /// Open (or create) the log at `path`.
    pub fn open(path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let file = open_append(path);
        Self {
            inner: Arc::new(Mutex::new(LogFileState {
                path: path.to_path_buf(),
                file,
            })),
        }
    }

    /// A writer that drops everything.
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogFileState {
                path: PathBuf::new(),
                file: None,
            })),
        }
    }
}

fn open_append(path: &Path) -> Option<File> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    Some(file)
}

fn rotate_if_needed(state: &mut LogFileState) {
    let Some(file) = &state.file else { return };
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    if size < MAX_LOG_SIZE {
        return;
    }
    // Truncate in place by recreating the file.
    state.file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&state.path)
        .ok();
    if let Some(f) = &mut state.file {
        let _ = writeln!(f, "log rotated (exceeded {} bytes)", MAX_LOG_SIZE);
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let Ok(mut state) = self.inner.lock() else {
            return Ok(buf.len());
        };
        rotate_if_needed(&mut state);
        if let Some(file) = &mut state.file {
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut state) = self.inner.lock() {
            if let Some(file) = &mut state.file {
                let _ = file.flush();
            }
        }
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
#[path = "logfile_tests.rs"]
mod tests;
