// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch-command template interpolation.
//!
//! Provider launch templates reference `${...}` variables that are filled
//! in at launch time. Unknown variables are left as-is so a typo surfaces
//! visibly in the spawned command rather than silently disappearing.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Variables available to a provider's launch template.
#[derive(Debug, Clone, Default)]
pub struct LaunchVars {
    pub work_dir: String,
    pub project: String,
    pub branch: String,
    pub server_url: String,
    pub session_id: String,
    pub skip_permissions: bool,
    /// Provider-specific flag text substituted for `${skip_flag}` when
    /// `skip_permissions` is set (e.g. `--dangerously-skip-permissions`).
    pub skip_flag: String,
    /// Resolved binary path (absolute or bare name).
    pub binary: String,
}

/// Render a launch template with the given variables.
///
/// An empty template renders to the empty string (the caller falls back to
/// the bare binary). The result is whitespace-normalized so an empty
/// `${skip_flag}` does not leave a double space behind.
pub fn render_launch_command(template: &str, vars: &LaunchVars) -> String {
    if template.is_empty() {
        return String::new();
    }

    let skip_flag = if vars.skip_permissions {
        vars.skip_flag.as_str()
    } else {
        ""
    };

    let rendered = VAR_PATTERN.replace_all(template, |caps: &regex::Captures| {
        match &caps[1] {
            "binary" => vars.binary.clone(),
            "workdir" => vars.work_dir.clone(),
            "project" => vars.project.clone(),
            "branch" => vars.branch.clone(),
            "server_url" => vars.server_url.clone(),
            "session_id" => vars.session_id.clone(),
            "skip_flag" => skip_flag.to_string(),
            // Unknown variable: leave the placeholder intact.
            _ => caps[0].to_string(),
        }
    });

    rendered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
