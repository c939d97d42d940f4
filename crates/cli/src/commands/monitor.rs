// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow monitor` - run the refresh and health-monitor loops
//!
//! Drives the two periodic loops until interrupted: the refresh loop
//! reconciles the registry against live mux state, and the capture loop
//! scrapes pane output into the health monitor, injecting recovery input
//! when a known failure signature sticks.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use vf_adapters::MuxAdapter;
use vf_engine::HealthStatus;

/// Pane capture cadence.
const CAPTURE_INTERVAL: Duration = Duration::from_secs(3);

pub async fn handle(name: Option<&str>, config_override: Option<&Path>) -> Result<()> {
    let components = super::load(config_override)?;
    let mut orch = super::orchestrator(&components);

    // Resolve an explicit session argument to its full tmux name once;
    // without one, every live session is watched.
    let selected = match name {
        Some(n) => {
            let store = components.store.clone();
            let lookup = n.to_string();
            let target = match tokio::task::spawn_blocking(move || store.get(&lookup)).await?? {
                Some(meta) => meta.tmux_session,
                None => vf_core::ensure_prefix(n),
            };
            Some(target)
        }
        None => None,
    };

    let refresh_interval = Duration::from_secs(components.config.poll_interval_seconds.max(1));
    // NOTE: Intervals must be created outside the loop - tokio::select!
    // re-evaluates branches on each iteration, so using sleep() inside
    // would reset on every event and the ticks would never fire.
    let mut refresh_tick = tokio::time::interval(refresh_interval);
    let mut capture_tick = tokio::time::interval(CAPTURE_INTERVAL);

    let mut last_status: HashMap<String, HealthStatus> = HashMap::new();

    match &selected {
        Some(target) => println!("Monitoring {} (Ctrl-C to stop)...", target),
        None => println!("Monitoring all sessions (Ctrl-C to stop)..."),
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
            _ = refresh_tick.tick() => {
                // A failed refresh is transient; log and retry next tick.
                if let Err(e) = orch.refresh().await {
                    tracing::warn!(error = %e, "refresh failed");
                }
            }
            _ = capture_tick.tick() => {
                let targets: Vec<String> = match &selected {
                    Some(target) => vec![target.clone()],
                    None => match orch.mux().list_sessions().await {
                        Ok(sessions) => sessions.into_iter().map(|s| s.name).collect(),
                        Err(e) => {
                            tracing::warn!(error = %e, "list sessions failed");
                            continue;
                        }
                    },
                };
                for target in targets {
                    match orch.capture_tick(&target).await {
                        Ok(Some(status)) => {
                            // Report transitions only; steady state is quiet.
                            if last_status.insert(target.clone(), status) != Some(status) {
                                println!("{}  {}", target, status);
                            }
                        }
                        Ok(None) => {
                            last_status.remove(&target);
                        }
                        Err(e) => {
                            tracing::debug!(session = %target, error = %e, "capture failed");
                        }
                    }
                }
            }
        }
    }
}
