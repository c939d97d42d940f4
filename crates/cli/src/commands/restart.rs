// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow restart` - re-create a session with the same settings

use anyhow::Result;
use std::path::Path;

pub async fn handle(
    name: &str,
    skip_permissions: bool,
    config_override: Option<&Path>,
) -> Result<()> {
    let components = super::load(config_override)?;
    let mut orch = super::orchestrator(&components);

    let meta = orch.restart(name, skip_permissions).await?;
    println!(
        "Session {:?} restarted (provider: {}, branch: {})",
        meta.name, meta.provider, meta.branch
    );
    Ok(())
}
