// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow config` - write the default configuration file

use anyhow::Result;
use std::path::Path;
use vf_engine::config;

pub fn handle(config_override: Option<&Path>) -> Result<()> {
    let path = match config_override {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };

    if path.exists() {
        // Validate and summarise the existing config instead of clobbering
        // a hand-edited file.
        let cfg = config::load(&path)?;
        println!("Config: {}", path.display());
        println!("  server_url:       {}", cfg.server_url);
        println!("  tmux_socket:      {}", cfg.tmux_socket);
        println!("  default_provider: {}", cfg.default_provider);
        let mut keys: Vec<&String> = cfg.providers.keys().collect();
        keys.sort();
        println!(
            "  providers:        {}",
            keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        );
        return Ok(());
    }

    let cfg = config::load(&path)?;
    config::save(&cfg, &path)?;
    println!("Wrote default config to {}", path.display());
    println!("Edit it to change providers, the tmux socket, or worktree policy.");
    Ok(())
}
