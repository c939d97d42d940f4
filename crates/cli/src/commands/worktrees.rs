// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow worktrees` - list git worktrees

use crate::table::{Column, Table};
use anyhow::Result;
use std::path::Path;
use vf_engine::WorktreeManager;

pub async fn handle(config_override: Option<&Path>) -> Result<()> {
    let components = super::load(config_override)?;

    let cwd = std::env::current_dir()?;
    let wm = WorktreeManager::new(&cwd, &components.config.worktree.base_dir).await?;

    let worktrees = wm.list().await?;
    if worktrees.is_empty() {
        println!("No worktrees.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::left("PATH").with_max(60),
        Column::left("BRANCH"),
        Column::left("HEAD"),
    ]);
    for wt in &worktrees {
        let branch = if wt.bare {
            "(bare)".to_string()
        } else if wt.detached {
            "(detached)".to_string()
        } else {
            wt.branch.clone()
        };
        let head: String = wt.head.chars().take(8).collect();
        table.row(vec![wt.path.display().to_string(), branch, head]);
    }
    table.render(&mut std::io::stdout());
    Ok(())
}
