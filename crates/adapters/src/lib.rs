// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vf-adapters: subprocess adapters for the vibeflow session manager.
//!
//! The mux adapter is the single point of contact with the terminal
//! multiplexer; the git adapter wraps the version-control CLI. Both shell
//! out with bounded timeouts and surface combined subprocess output in
//! their errors.

pub mod env;
mod git;
mod mux;
pub mod subprocess;

pub use git::{GitAdapter, GitError, Worktree};
pub use mux::{CreateSessionOpts, MuxAdapter, MuxError, TmuxAdapter};

#[cfg(any(test, feature = "test-support"))]
pub use mux::{FakeMuxAdapter, MuxCall};
