// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the orchestration layer

use crate::worktree::WorktreeError;
use thiserror::Error;
use vf_adapters::MuxError;
use vf_storage::StoreError;

/// Errors from the launch/kill/restart/refresh flows.
///
/// Precondition failures (unknown agent, missing binary, missing env var)
/// surface before any state is touched: no mux session, no marker file, no
/// registry entry.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("unknown provider {0:?}")]
    UnknownProvider(String),
    #[error("provider {provider:?} binary {binary:?} not found on PATH")]
    BinaryNotFound { provider: String, binary: String },
    #[error("provider {provider:?} requires env var {var:?} — set it in the environment or the saved config")]
    MissingEnvVar { provider: String, var: String },
    #[error("session {0:?} not found in store")]
    SessionNotFound(String),
    #[error("session {0:?} was not created — has-session check failed")]
    SessionVanished(String),
    #[error("create worktree: {0}")]
    Worktree(#[from] WorktreeError),
    #[error(transparent)]
    Mux(#[from] MuxError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("launch io: {0}")]
    Io(#[from] std::io::Error),
}
