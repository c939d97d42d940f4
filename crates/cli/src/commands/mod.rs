// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommand implementations.

pub mod agent_doc;
pub mod check;
pub mod config;
pub mod kill;
pub mod launch;
pub mod list;
pub mod monitor;
pub mod restart;
pub mod switch;
pub mod version;
pub mod worktrees;

use anyhow::Result;
use std::path::Path;
use vf_adapters::TmuxAdapter;
use vf_core::SystemClock;
use vf_engine::{Config, SessionOrchestrator};
use vf_storage::SessionStore;

/// The standard set of components a subcommand needs.
pub(crate) struct Components {
    pub config: Config,
    pub mux: TmuxAdapter,
    pub store: SessionStore,
}

/// Load config and construct the adapters.
pub(crate) fn load(config_override: Option<&Path>) -> Result<Components> {
    let config_path = match config_override {
        Some(p) => p.to_path_buf(),
        None => vf_engine::config::config_path()?,
    };
    let config = vf_engine::config::load(&config_path)?;
    let mux = TmuxAdapter::new(&config.tmux_socket);
    let store = SessionStore::new()?;
    Ok(Components { config, mux, store })
}

/// Build an orchestrator over the loaded components.
pub(crate) fn orchestrator(c: &Components) -> SessionOrchestrator<TmuxAdapter, SystemClock> {
    SessionOrchestrator::new(
        c.config.clone(),
        c.mux.clone(),
        c.store.clone(),
        SystemClock,
    )
}
