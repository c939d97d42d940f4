// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow check` - check a directory for session conflicts

use crate::exit_error::ExitError;
use anyhow::Result;
use std::path::Path;
use vf_engine::{conflict, ConflictStatus};

pub async fn handle(dir: Option<&Path>, config_override: Option<&Path>) -> Result<()> {
    let components = super::load(config_override)?;
    let dir = dir.unwrap_or_else(|| Path::new("."));

    let result = conflict::check(dir, "", Some(&components.mux)).await;
    match result.status {
        ConflictStatus::None => {
            println!("No conflicts detected.");
            Ok(())
        }
        ConflictStatus::Active => {
            println!(
                "ACTIVE conflict: session {} (provider: {})",
                result.session_id, result.provider
            );
            println!("File: {}", result.file_path.display());
            Err(ExitError::silent(1).into())
        }
        ConflictStatus::Stale => {
            println!(
                "STALE conflict: session {} (provider: {}) — no longer running",
                result.session_id, result.provider
            );
            println!("File: {}", result.file_path.display());
            println!("Remove the marker file (or kill the session) to clear it.");
            Err(ExitError::silent(1).into())
        }
        ConflictStatus::External => {
            println!(
                "EXTERNAL session marker: session {} (provider: {}) — not managed by vibeflow",
                result.session_id, result.provider
            );
            println!("File: {}", result.file_path.display());
            Err(ExitError::silent(1).into())
        }
    }
}
