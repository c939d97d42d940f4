// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow switch` - attach to a session

use anyhow::Result;
use std::path::Path;
use vf_adapters::MuxAdapter;

pub async fn handle(name: &str, config_override: Option<&Path>) -> Result<()> {
    let components = super::load(config_override)?;

    // Prefer the registry's full tmux name; fall back to treating the
    // argument as a (short or full) tmux name directly. The store blocks
    // on its file lock, so the lookup runs off the runtime.
    let store = components.store.clone();
    let lookup = name.to_string();
    let target = match tokio::task::spawn_blocking(move || store.get(&lookup)).await?? {
        Some(meta) => meta.tmux_session,
        None => name.to_string(),
    };

    // Blocks until the mux client exits (detach or session end).
    components.mux.attach(&target).await?;
    Ok(())
}
