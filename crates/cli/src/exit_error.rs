// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error wrapper carrying a process exit code.

/// An error that selects the process exit code.
///
/// An empty message suppresses the `Error:` line; the advisory output was
/// already printed by the command itself.
#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    /// Exit with `code` after the command has printed its own output.
    pub fn silent(code: i32) -> Self {
        Self {
            code,
            message: String::new(),
        }
    }
}

impl std::fmt::Display for ExitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}
