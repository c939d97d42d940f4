// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vibeflow - terminal session manager for AI coding agents

mod color;
mod commands;
mod exit_error;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vf_engine::logfile::LogFile;

#[derive(Parser)]
#[command(
    name = "vibeflow",
    version,
    about = "vibeflow - run AI coding agents in managed tmux sessions"
)]
struct Cli {
    /// Config file path (default: ~/.vibeflow-cli/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and launch a new session
    Launch(commands::launch::LaunchArgs),
    /// List active sessions
    #[command(alias = "ls")]
    List,
    /// Attach to a session
    Switch {
        /// Session name
        name: String,
    },
    /// Kill a session
    #[command(alias = "delete", alias = "rm")]
    Kill {
        /// Session name
        name: String,
        /// Also remove the session's git worktree
        #[arg(long)]
        cleanup_worktree: bool,
    },
    /// Restart a session (kill and re-launch with the same settings)
    Restart {
        /// Session name
        name: String,
        /// Skip permission prompts (autonomous mode)
        #[arg(long)]
        skip_permissions: bool,
    },
    /// Watch sessions, reconcile the registry, and auto-recover failing
    /// agents
    #[command(alias = "watch")]
    Monitor {
        /// Session to watch (default: all live sessions)
        name: Option<String>,
    },
    /// List git worktrees
    #[command(alias = "wt")]
    Worktrees,
    /// Check a directory for session conflicts
    Check {
        /// Directory to check (default: current directory)
        dir: Option<PathBuf>,
    },
    /// Print the embedded agent instruction template for a provider
    AgentDoc {
        /// Provider key (claude, codex, gemini)
        provider: String,
    },
    /// Write the default configuration file
    Config,
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VIBEFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(LogFile::open_default())
        .with_ansi(false)
        .init();
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Launch(args) => commands::launch::handle(args, cli.config.as_deref()).await,
        Commands::List => commands::list::handle(cli.config.as_deref()).await,
        Commands::Switch { name } => commands::switch::handle(&name, cli.config.as_deref()).await,
        Commands::Kill {
            name,
            cleanup_worktree,
        } => commands::kill::handle(&name, cleanup_worktree, cli.config.as_deref()).await,
        Commands::Restart {
            name,
            skip_permissions,
        } => commands::restart::handle(&name, skip_permissions, cli.config.as_deref()).await,
        Commands::Monitor { name } => {
            commands::monitor::handle(name.as_deref(), cli.config.as_deref()).await
        }
        Commands::Worktrees => commands::worktrees::handle(cli.config.as_deref()).await,
        Commands::Check { dir } => commands::check::handle(dir.as_deref(), cli.config.as_deref()).await,
        Commands::AgentDoc { provider } => commands::agent_doc::handle(&provider),
        Commands::Config => commands::config::handle(cli.config.as_deref()),
        Commands::Version => {
            commands::version::handle();
            Ok(())
        }
    }
}
