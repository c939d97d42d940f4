// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow kill` - kill a session

use anyhow::Result;
use std::path::Path;

pub async fn handle(
    name: &str,
    cleanup_worktree: bool,
    config_override: Option<&Path>,
) -> Result<()> {
    let components = super::load(config_override)?;
    let mut orch = super::orchestrator(&components);

    orch.kill(name, cleanup_worktree).await?;
    println!("Session {:?} killed.", name);
    Ok(())
}
