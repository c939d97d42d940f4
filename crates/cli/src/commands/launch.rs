// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow launch` - create and launch a new session

use crate::exit_error::ExitError;
use anyhow::Result;
use clap::Args;
use std::path::Path;
use vf_engine::{ConflictChoice, LaunchOutcome, LaunchRequest};

#[derive(Args)]
pub struct LaunchArgs {
    /// Provider key (claude, codex, gemini)
    #[arg(long)]
    provider: Option<String>,

    /// Git branch (default: main)
    #[arg(long)]
    branch: Option<String>,

    /// Working directory (default: configured default, then current dir)
    #[arg(long, value_name = "DIR")]
    dir: Option<String>,

    /// Create a new git worktree for the session
    #[arg(long)]
    worktree: bool,

    /// Custom worktree directory name (default: auto-generated)
    #[arg(long)]
    worktree_name: Option<String>,

    /// Create a new git branch (used with --worktree)
    #[arg(long)]
    new_branch: bool,

    /// Skip permission prompts (autonomous mode)
    #[arg(long)]
    skip_permissions: bool,

    /// Persona label scoping the session marker
    #[arg(long)]
    persona: Option<String>,
}

pub async fn handle(args: LaunchArgs, config_override: Option<&Path>) -> Result<()> {
    let components = super::load(config_override)?;
    let mut orch = super::orchestrator(&components);

    let request = LaunchRequest {
        provider: args.provider.unwrap_or_default(),
        branch: args.branch.unwrap_or_default(),
        work_dir: args.dir,
        worktree: if args.worktree {
            vf_engine::WorktreeChoice::Create
        } else {
            vf_engine::WorktreeChoice::Disabled
        },
        worktree_name: args.worktree_name,
        new_branch: args.new_branch,
        skip_permissions: args.skip_permissions,
        persona: args.persona.unwrap_or_default(),
        ..LaunchRequest::default()
    };

    match orch.launch(request).await? {
        LaunchOutcome::Launched(meta) => {
            println!(
                "Session {:?} launched (provider: {}, branch: {})",
                meta.name, meta.provider, meta.branch
            );
            Ok(())
        }
        LaunchOutcome::Blocked { conflict, options } => {
            println!("Session conflict detected:");
            println!("  Session:  {}", conflict.session_id);
            println!("  Provider: {}", conflict.provider);
            println!("  Status:   {}", conflict.status);
            println!("  File:     {}", conflict.file_path.display());
            println!();
            for option in options {
                match option {
                    ConflictChoice::Switch => {
                        println!("  - switch to it: vibeflow switch {}", conflict.session_id)
                    }
                    ConflictChoice::Worktree => {
                        println!("  - launch in a fresh worktree: vibeflow launch --worktree")
                    }
                    ConflictChoice::TakeOver | ConflictChoice::Cleanup => println!(
                        "  - clear the marker: rm {}",
                        conflict.file_path.display()
                    ),
                    ConflictChoice::Cancel => {}
                }
            }
            Err(ExitError::silent(1).into())
        }
    }
}
