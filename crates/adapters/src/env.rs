// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use regex::Regex;
use std::sync::LazyLock;

/// Whether the current process is running inside a tmux client
/// (i.e. `$TMUX` is set).
pub fn inside_tmux() -> bool {
    std::env::var_os("TMUX").is_some_and(|v| !v.is_empty())
}

#[allow(clippy::expect_used)]
static ENV_REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Expand `${VAR}` references in `value` against the ambient environment.
///
/// Unset variables expand to the empty string, matching shell semantics for
/// launch-time env plumbing.
pub fn expand_env_refs(value: &str) -> String {
    ENV_REF_PATTERN
        .replace_all(value, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
