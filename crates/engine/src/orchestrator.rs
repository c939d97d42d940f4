// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session orchestration.
//!
//! The launch pipeline resolves the working directory (possibly through a
//! worktree), checks for directory conflicts, renders the agent's launch
//! command, creates the mux session, and persists metadata. Precondition
//! failures happen before any of that, so they commit nothing. A blocked launch is not
//! an error: it returns the conflict plus the resolution options the UI
//! should offer.

use crate::agentdocs;
use crate::client::{SessionInitRequest, SessionRegisterRequest, VibeflowClient};
use crate::config::{self, Config};
use crate::conflict::{self, ConflictResult, ConflictStatus};
use crate::error::LaunchError;
use crate::health::{HealthMonitor, HealthStatus};
use crate::patterns::PatternRegistry;
use crate::pidlock;
use crate::provider::ProviderRegistry;
use crate::worktree::WorktreeManager;
use chrono::Utc;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};
use vf_adapters::{CreateSessionOpts, GitAdapter, MuxAdapter};
use vf_core::{
    ensure_prefix, full_session_name, parse_session_kind, render_launch_command, session_id,
    short_name, Clock, LaunchVars, MuxSession, SessionMeta,
};
use vf_storage::{SessionStore, StoreError};

/// How many trailing pane lines each capture tick grabs.
const CAPTURE_LINES: u32 = 100;

/// CSI and OSC escape sequences; pane captures are stripped before they
/// reach the health monitor.
#[allow(clippy::expect_used)]
static ANSI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\x1b\][^\x07]*\x07")
        .expect("constant regex pattern is valid")
});

/// Remove ANSI escape sequences from captured pane text.
pub fn strip_ansi(text: &str) -> String {
    ANSI_PATTERN.replace_all(text, "").into_owned()
}

/// How the working directory relates to a worktree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorktreeChoice {
    /// Launch directly in the resolved working directory.
    #[default]
    Disabled,
    /// Create a new worktree under the configured base directory.
    Create,
    /// Create a new worktree under a custom base directory.
    CreateIn(PathBuf),
    /// Adopt an existing worktree path.
    Existing(PathBuf),
    /// Use the given directory as-is.
    Specified(PathBuf),
}

/// Parameters for launching a session.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// Provider key; empty selects the configured default.
    pub provider: String,
    /// Git branch; empty defaults to "main".
    pub branch: String,
    /// Explicit working directory; overrides the configured default.
    pub work_dir: Option<String>,
    pub worktree: WorktreeChoice,
    /// Custom worktree directory name; auto-generated when empty.
    pub worktree_name: Option<String>,
    /// Create the worktree branch explicitly (`-b`).
    pub new_branch: bool,
    pub skip_permissions: bool,
    /// Role label scoping the marker file.
    pub persona: String,
    /// Project label; falls back to the configured default project.
    pub project: Option<String>,
    /// Mint the session id (and initial prompt) from the management server.
    pub use_server: bool,
    /// Server session id to reuse, from an explicit user choice. Wins over
    /// the marker file's id; a fresh local id is the last resort.
    pub reuse_session_id: Option<String>,
    /// Skip the conflict check (set when resolving a conflict forced a new
    /// worktree or removed the marker).
    pub bypass_conflict: bool,
}

/// Resolution options offered for a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Attach to the existing live session.
    Switch,
    /// Continue the launch in a new worktree, bypassing the conflict.
    Worktree,
    /// Remove the marker and reuse the old session id when re-initialising.
    TakeOver,
    /// Remove the stale marker and proceed.
    Cleanup,
    Cancel,
}

impl ConflictChoice {
    /// The choice set for a conflict status. Owned here, not by the UI.
    pub fn options_for(status: ConflictStatus) -> Vec<ConflictChoice> {
        match status {
            ConflictStatus::Active => vec![
                ConflictChoice::Switch,
                ConflictChoice::Worktree,
                ConflictChoice::Cancel,
            ],
            ConflictStatus::External => vec![
                ConflictChoice::TakeOver,
                ConflictChoice::Worktree,
                ConflictChoice::Cancel,
            ],
            ConflictStatus::Stale => vec![ConflictChoice::Cleanup, ConflictChoice::Cancel],
            ConflictStatus::None => Vec::new(),
        }
    }
}

/// Result of a launch attempt.
#[derive(Debug, Clone)]
pub enum LaunchOutcome {
    Launched(SessionMeta),
    /// The target directory is claimed; the launch was suspended.
    Blocked {
        conflict: ConflictResult,
        options: Vec<ConflictChoice>,
    },
}

/// Result of resolving a conflict.
#[derive(Debug, Clone)]
pub enum ConflictResolution {
    /// Attach to this tmux session.
    Attach(String),
    /// The relaunch outcome after the chosen adjustment.
    Outcome(LaunchOutcome),
    Cancelled,
}

/// Result of a refresh pass.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// All registry records after reconciliation.
    pub sessions: Vec<SessionMeta>,
    /// Live sessions as reported by the mux.
    pub live: Vec<MuxSession>,
    /// Short names of sessions recovered from orphaned mux state.
    pub recovered: Vec<String>,
}

/// Ties the adapters, the registry, and the health monitor into the
/// session lifecycle flows.
pub struct SessionOrchestrator<M: MuxAdapter, C: Clock> {
    config: Config,
    mux: M,
    store: SessionStore,
    providers: ProviderRegistry,
    health: HealthMonitor<C>,
    git: GitAdapter,
    pid_lock_path: PathBuf,
}

impl<M: MuxAdapter, C: Clock> SessionOrchestrator<M, C> {
    pub fn new(config: Config, mux: M, store: SessionStore, clock: C) -> Self {
        let providers = ProviderRegistry::new(config.providers.clone());
        let health = HealthMonitor::new(PatternRegistry::new(), config.error_recovery, clock);
        let pid_lock_path = pidlock::pid_lock_path().unwrap_or_default();
        Self {
            config,
            mux,
            store,
            providers,
            health,
            git: GitAdapter::new(),
            pid_lock_path,
        }
    }

    pub fn with_pid_lock_path(mut self, path: PathBuf) -> Self {
        self.pid_lock_path = path;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn mux(&self) -> &M {
        &self.mux
    }

    /// Read-only health snapshot for a tmux session.
    pub fn health(&self, tmux_name: &str) -> Option<&crate::health::SessionHealth> {
        self.health.health(tmux_name)
    }

    /// Manual health reset (user-initiated retry).
    pub fn reset_health(&mut self, tmux_name: &str) {
        self.health.reset(tmux_name);
    }

    /// Run a registry operation off the async runtime.
    ///
    /// Store operations hold an advisory file lock with a bounded blocking
    /// retry, so they must not run on a runtime worker thread.
    async fn store_task<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(SessionStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || f(store)).await {
            Ok(result) => result,
            Err(e) => Err(StoreError::Task(e.to_string())),
        }
    }

    /// Launch a new session.
    pub async fn launch(&mut self, req: LaunchRequest) -> Result<LaunchOutcome, LaunchError> {
        // Preconditions first: nothing below may commit state until the
        // provider, binary, and env are all resolvable.
        let provider_key = self.resolve_provider_key(&req.provider);
        let provider = self
            .providers
            .get(&provider_key)
            .ok_or_else(|| LaunchError::UnknownProvider(provider_key.clone()))?
            .clone();
        self.providers.refresh();
        if !self.providers.is_available(&provider_key) {
            return Err(LaunchError::BinaryNotFound {
                provider: provider_key,
                binary: provider.binary,
            });
        }
        let (extra_env, missing_var) = config::resolve_provider_env(&self.config, &provider_key);
        if let Some(var) = missing_var {
            return Err(LaunchError::MissingEnvVar {
                provider: provider_key,
                var,
            });
        }

        let mut work_dir = self.config.resolve_work_dir(req.work_dir.as_deref());
        let branch = if req.branch.is_empty() {
            "main".to_string()
        } else {
            req.branch.clone()
        };

        // Worktree resolution happens before the mux is touched; a failure
        // here surfaces as-is.
        let mut worktree_path = String::new();
        match &req.worktree {
            WorktreeChoice::Disabled => {}
            WorktreeChoice::Create => {
                let wm =
                    WorktreeManager::new(&work_dir, &self.config.worktree.base_dir).await?;
                let name = self.worktree_name(&req, &provider_key, &branch);
                let path = wm.create(&name, &branch, req.new_branch).await?;
                worktree_path = path.display().to_string();
                work_dir = path;
            }
            WorktreeChoice::CreateIn(base) => {
                let wm =
                    WorktreeManager::new(&work_dir, &self.config.worktree.base_dir).await?;
                let name = self.worktree_name(&req, &provider_key, &branch);
                let path = wm.create_in_dir(base, &name, &branch, req.new_branch).await?;
                worktree_path = path.display().to_string();
                work_dir = path;
            }
            WorktreeChoice::Existing(path) => {
                worktree_path = path.display().to_string();
                work_dir = path.clone();
            }
            WorktreeChoice::Specified(path) => {
                work_dir = path.clone();
            }
        }

        if !req.bypass_conflict {
            let conflict = conflict::check(&work_dir, &req.persona, Some(&self.mux)).await;
            if conflict.status != ConflictStatus::None {
                tracing::info!(
                    dir = %work_dir.display(),
                    status = %conflict.status,
                    session = %conflict.session_id,
                    "launch blocked by conflict"
                );
                let options = ConflictChoice::options_for(conflict.status);
                return Ok(LaunchOutcome::Blocked { conflict, options });
            }
        }

        let project = req
            .project
            .clone()
            .unwrap_or_else(|| self.config.default_project.clone());

        // Each launch gets a fresh id so concurrent sessions in one
        // directory still get distinct tmux names. A server-issued id
        // replaces it below for managed sessions.
        let mut name = session_id::generate();
        let mut server_session_id = String::new();
        let mut server_project_id = 0i64;
        let mut agent_prompt = String::new();
        let client = if req.use_server {
            VibeflowClient::new(&self.config.server_url, &self.config.api_token).ok()
        } else {
            None
        };

        if let Some(client) = &client {
            // Explicit user choice wins; the marker file's id is the
            // fallback so an existing server session is reused instead of
            // duplicated.
            let reuse_id = req
                .reuse_session_id
                .clone()
                .or_else(|| conflict::read_marker_id(&work_dir, &req.persona))
                .unwrap_or_default();
            let init_req = SessionInitRequest {
                project_name: project.clone(),
                session_id: reuse_id,
                persona: req.persona.clone(),
                git_branch: branch.clone(),
                working_directory: work_dir.display().to_string(),
                agent_type: provider_key.clone(),
            };
            match client.session_init(&init_req).await {
                Ok(init) => {
                    server_session_id = init.session_id.clone();
                    server_project_id = init.project_id;
                    agent_prompt = init.prompt;
                    if !init.session_id.is_empty() {
                        // Server id doubles as the local name so the format
                        // matches vanilla launches.
                        name = init.session_id;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "session_init failed, falling back to local id");
                }
            }
        }

        // Prompt injection happens before session creation so the agent
        // reads it on first boot.
        if !agent_prompt.is_empty() {
            let injected = if provider.vibeflow_integrated {
                agentdocs::inject_prompt(
                    &work_dir,
                    &provider_key,
                    &agent_prompt,
                    &project,
                    &req.persona,
                    &server_session_id,
                )
            } else {
                agentdocs::write_prompt_file(&work_dir, &agent_prompt)
            };
            if let Err(e) = injected {
                tracing::warn!(error = %e, "prompt injection failed");
            }
        }

        agentdocs::ensure_all(&work_dir);

        let command = self.render_command(
            &provider.launch_template,
            &provider.binary,
            &provider.skip_permissions_flag,
            &work_dir,
            &project,
            &branch,
            &name,
            req.skip_permissions,
        );

        // Provider env merged with resolved secrets, sorted for stable
        // spawn command lines.
        let mut env: BTreeMap<String, String> = provider.env.clone().into_iter().collect();
        env.extend(extra_env);

        let _ = self.mux.ensure_server().await;
        self.mux
            .create_session(&CreateSessionOpts {
                name: name.clone(),
                kind: provider_key.clone(),
                work_dir: work_dir.clone(),
                command,
                env: env.into_iter().collect(),
                branch: branch.clone(),
                project: project.clone(),
            })
            .await?;

        let tmux_name = full_session_name(&provider_key, &name);
        if !self.mux.has_session(&tmux_name).await {
            return Err(LaunchError::SessionVanished(tmux_name));
        }

        if let Err(e) = self
            .mux
            .bind_session_keys(&tmux_name, &self.pid_lock_path)
            .await
        {
            tracing::warn!(session = %tmux_name, error = %e, "bind session keys failed");
        }

        if !provider.session_file.is_empty() {
            conflict::write_marker_if_needed(&work_dir, &req.persona, &name)?;
        }

        if let (Some(client), false) = (&client, server_session_id.is_empty()) {
            let register = SessionRegisterRequest {
                session_id: server_session_id.clone(),
                project_id: server_project_id,
                working_directory: work_dir.display().to_string(),
                git_branch: branch.clone(),
                git_worktree_path: worktree_path.clone(),
            };
            if let Err(e) = client.session_register(&register).await {
                tracing::warn!(error = %e, "session_register failed");
            }
        }

        let meta = SessionMeta {
            name: name.clone(),
            tmux_session: tmux_name.clone(),
            provider: provider_key,
            project,
            persona: req.persona.clone(),
            branch,
            worktree_path,
            working_dir: work_dir.display().to_string(),
            vibeflow_session_id: server_session_id,
            created_at: Utc::now(),
        };
        let record = meta.clone();
        self.store_task(move |s| s.add(record)).await?;

        tracing::info!(
            session = %tmux_name,
            provider = %meta.provider,
            work_dir = %meta.working_dir,
            "session launched"
        );
        Ok(LaunchOutcome::Launched(meta))
    }

    /// Drive the user's conflict choice.
    pub async fn resolve_conflict(
        &mut self,
        mut req: LaunchRequest,
        conflict: &ConflictResult,
        choice: ConflictChoice,
    ) -> Result<ConflictResolution, LaunchError> {
        match choice {
            ConflictChoice::Switch => Ok(ConflictResolution::Attach(conflict.tmux_session.clone())),
            ConflictChoice::Worktree => {
                if req.worktree == WorktreeChoice::Disabled {
                    req.worktree = WorktreeChoice::Create;
                }
                req.bypass_conflict = true;
                Ok(ConflictResolution::Outcome(self.launch(req).await?))
            }
            ConflictChoice::TakeOver => {
                conflict::remove_marker(conflict_dir(conflict), &conflict.persona);
                if req.use_server && req.reuse_session_id.is_none() {
                    req.reuse_session_id = Some(conflict.session_id.clone());
                }
                Ok(ConflictResolution::Outcome(self.launch(req).await?))
            }
            ConflictChoice::Cleanup => {
                conflict::remove_marker(conflict_dir(conflict), &conflict.persona);
                Ok(ConflictResolution::Outcome(self.launch(req).await?))
            }
            ConflictChoice::Cancel => Ok(ConflictResolution::Cancelled),
        }
    }

    /// Kill a session: mux session, marker file, optional worktree,
    /// registry entry, health tracking.
    pub async fn kill(&mut self, name: &str, cleanup_worktree: bool) -> Result<(), LaunchError> {
        let lookup = name.to_string();
        let meta = self.store_task(move |s| s.get(&lookup)).await?;
        let target = meta
            .as_ref()
            .map(|m| m.tmux_session.clone())
            .unwrap_or_else(|| ensure_prefix(name));
        self.mux.kill(&target).await?;

        let Some(meta) = meta else {
            return Ok(());
        };
        conflict::remove_marker(Path::new(&meta.working_dir), &meta.persona);

        if cleanup_worktree && !meta.worktree_path.is_empty() {
            match WorktreeManager::new(
                Path::new(&meta.working_dir),
                &self.config.worktree.base_dir,
            )
            .await
            {
                Ok(wm) => {
                    if let Err(e) = wm.remove(Path::new(&meta.worktree_path), true).await {
                        tracing::warn!(
                            worktree = %meta.worktree_path,
                            error = %e,
                            "worktree removal failed"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "worktree manager unavailable for cleanup");
                }
            }
        }

        let record_name = meta.name.clone();
        self.store_task(move |s| s.remove(&record_name)).await?;
        self.health.remove(&meta.tmux_session);
        tracing::info!(session = %meta.tmux_session, "session killed");
        Ok(())
    }

    /// Re-create a session's mux process, preserving its metadata.
    pub async fn restart(
        &mut self,
        name: &str,
        skip_permissions: bool,
    ) -> Result<SessionMeta, LaunchError> {
        let lookup = name.to_string();
        let meta = self
            .store_task(move |s| s.get(&lookup))
            .await?
            .ok_or_else(|| LaunchError::SessionNotFound(name.to_string()))?;

        let provider_key = self.resolve_provider_key(&meta.provider);
        let provider = self
            .providers
            .get(&provider_key)
            .ok_or_else(|| LaunchError::UnknownProvider(provider_key.clone()))?
            .clone();
        self.providers.refresh();
        if !self.providers.is_available(&provider_key) {
            return Err(LaunchError::BinaryNotFound {
                provider: provider_key,
                binary: provider.binary,
            });
        }
        let (extra_env, missing_var) = config::resolve_provider_env(&self.config, &provider_key);
        if let Some(var) = missing_var {
            return Err(LaunchError::MissingEnvVar {
                provider: provider_key,
                var,
            });
        }

        let _ = self.mux.ensure_server().await;
        let _ = self.mux.kill(&meta.tmux_session).await;
        self.health.remove(&meta.tmux_session);

        let work_dir = if meta.working_dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&meta.working_dir)
        };
        let branch = if meta.branch.is_empty() {
            "main".to_string()
        } else {
            meta.branch.clone()
        };

        agentdocs::ensure_all(&work_dir);

        let command = self.render_command(
            &provider.launch_template,
            &provider.binary,
            &provider.skip_permissions_flag,
            &work_dir,
            &meta.project,
            &branch,
            &meta.name,
            skip_permissions,
        );
        let mut env: BTreeMap<String, String> = provider.env.clone().into_iter().collect();
        env.extend(extra_env);

        self.mux
            .create_session(&CreateSessionOpts {
                name: meta.name.clone(),
                kind: provider_key.clone(),
                work_dir: work_dir.clone(),
                command,
                env: env.into_iter().collect(),
                branch: branch.clone(),
                project: meta.project.clone(),
            })
            .await?;

        let tmux_name = full_session_name(&provider_key, &meta.name);
        if !self.mux.has_session(&tmux_name).await {
            return Err(LaunchError::SessionVanished(tmux_name));
        }
        let _ = self
            .mux
            .bind_session_keys(&tmux_name, &self.pid_lock_path)
            .await;

        if !provider.session_file.is_empty() {
            conflict::write_marker_if_needed(&work_dir, &meta.persona, &meta.name)?;
        }

        let updated = SessionMeta {
            tmux_session: tmux_name,
            provider: provider_key,
            branch,
            working_dir: work_dir.display().to_string(),
            created_at: Utc::now(),
            ..meta
        };
        let record = updated.clone();
        self.store_task(move |s| s.add(record)).await?;
        Ok(updated)
    }

    /// Reconcile the registry against live mux state and recover orphans.
    ///
    /// Individual subprocess errors while reconstructing one orphan are
    /// logged and skipped; the next tick retries.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, LaunchError> {
        let live = self.mux.list_sessions().await?;
        let live_names: Vec<String> = live.iter().map(|s| s.name.clone()).collect();

        let active = live_names.clone();
        self.store_task(move |s| s.sync(&active)).await?;

        let known = live_names.clone();
        let discovered = self.store_task(move |s| s.discover(&known)).await?;

        let mut recovered = Vec::new();
        for full in discovered {
            let kind = parse_session_kind(&full).unwrap_or_default().to_string();
            let short = short_name(&full).to_string();
            let work_dir = self.mux.pane_work_dir(&full).await;
            let branch = if work_dir.is_empty() {
                String::new()
            } else {
                self.git.current_branch(Path::new(&work_dir)).await
            };
            let meta = SessionMeta {
                name: short.clone(),
                tmux_session: full.clone(),
                provider: kind,
                project: self.config.default_project.clone(),
                persona: String::new(),
                branch,
                worktree_path: String::new(),
                working_dir: work_dir,
                vibeflow_session_id: String::new(),
                created_at: Utc::now(),
            };
            if let Err(e) = self.store_task(move |s| s.add(meta)).await {
                tracing::warn!(session = %full, error = %e, "orphan re-add failed");
                continue;
            }
            tracing::info!(session = %full, "recovered orphaned session");
            recovered.push(short);
        }

        // Re-apply key bindings so they survive mux config reloads.
        self.mux.bind_all_session_keys(&self.pid_lock_path).await;
        self.providers.refresh();

        Ok(RefreshOutcome {
            sessions: self.store_task(|s| s.list()).await?,
            live,
            recovered,
        })
    }

    /// One capture-loop tick for the selected session: grab the pane tail,
    /// strip ANSI, feed the health monitor, and fire recovery when asked.
    pub async fn capture_tick(
        &mut self,
        tmux_name: &str,
    ) -> Result<Option<HealthStatus>, LaunchError> {
        let live = self.mux.list_sessions().await?;
        let Some(session) = live.iter().find(|s| s.name == tmux_name) else {
            return Ok(None);
        };

        let raw = self.mux.capture_pane(tmux_name, CAPTURE_LINES).await?;
        let text = strip_ansi(&raw);
        let kind = parse_session_kind(tmux_name).unwrap_or_default().to_string();

        if self
            .health
            .check_output(tmux_name, &kind, &text, session.attached)
        {
            self.health.attempt_recovery(tmux_name, &self.mux).await?;
        }
        Ok(self.health.health(tmux_name).map(|h| h.status))
    }

    fn resolve_provider_key(&self, requested: &str) -> String {
        if !requested.is_empty() {
            return requested.to_string();
        }
        if !self.config.default_provider.is_empty() {
            return self.config.default_provider.clone();
        }
        self.providers
            .default_key()
            .unwrap_or("claude")
            .to_string()
    }

    fn worktree_name(&self, req: &LaunchRequest, provider_key: &str, branch: &str) -> String {
        match &req.worktree_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}-{}-{}", provider_key, branch, unix_epoch()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_command(
        &self,
        template: &str,
        binary: &str,
        skip_flag: &str,
        work_dir: &Path,
        project: &str,
        branch: &str,
        session_id: &str,
        skip_permissions: bool,
    ) -> String {
        let rendered = render_launch_command(
            template,
            &LaunchVars {
                work_dir: work_dir.display().to_string(),
                project: project.to_string(),
                branch: branch.to_string(),
                server_url: self.config.server_url.clone(),
                session_id: session_id.to_string(),
                skip_permissions,
                skip_flag: skip_flag.to_string(),
                binary: binary.to_string(),
            },
        );
        if rendered.is_empty() {
            binary.to_string()
        } else {
            rendered
        }
    }
}

fn conflict_dir(conflict: &ConflictResult) -> &Path {
    conflict
        .file_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
}

fn unix_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
