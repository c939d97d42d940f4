// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow list` - list active sessions

use crate::table::{Column, Table};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use vf_core::{MuxSession, SessionMeta};

pub async fn handle(config_override: Option<&Path>) -> Result<()> {
    let components = super::load(config_override)?;
    let mut orch = super::orchestrator(&components);

    // Reconcile before rendering: reap registry records whose session died
    // outside the tool, and reconstruct metadata for orphaned live
    // sessions (agent kind from the name, work dir from the pane, branch
    // from git).
    let outcome = orch.refresh().await?;
    if outcome.live.is_empty() {
        println!("No active sessions.");
        return Ok(());
    }

    let meta: HashMap<&str, &SessionMeta> = outcome
        .sessions
        .iter()
        .map(|m| (m.tmux_session.as_str(), m))
        .collect();
    let recovered: HashSet<&str> = outcome.recovered.iter().map(String::as_str).collect();

    let mut table = Table::new(vec![
        Column::left("NAME"),
        Column::left("PROVIDER"),
        Column::left("BRANCH"),
        Column::status("STATUS"),
    ]);
    for session in &outcome.live {
        let (name, provider, branch) = match meta.get(session.name.as_str()) {
            Some(m) => (
                m.name.clone(),
                display_or_dash(&m.provider),
                display_or_dash(&m.branch),
            ),
            None => (session.name.clone(), "-".to_string(), "-".to_string()),
        };
        let status = if recovered.contains(name.as_str()) {
            "recovered".to_string()
        } else {
            status_label(session)
        };
        table.row(vec![name, provider, branch, status]);
    }
    table.render(&mut std::io::stdout());
    Ok(())
}

fn display_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn status_label(session: &MuxSession) -> String {
    if session.pane_dead {
        "dead".to_string()
    } else if session.attached {
        "attached".to_string()
    } else {
        "idle".to_string()
    }
}
