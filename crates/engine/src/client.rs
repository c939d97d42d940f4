// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Management-server REST client.
//!
//! Optional integration: every caller treats a failure here as
//! fall-back-to-local, so errors carry the HTTP status and body text but
//! never abort a launch on their own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Total request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for the reachability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// A management-server project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

/// Parameters for initialising a managed session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionInitRequest {
    pub project_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub persona: String,
    pub git_branch: String,
    pub working_directory: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub agent_type: String,
}

/// Response from session init.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInitResult {
    pub session_id: String,
    #[serde(default)]
    pub project_id: i64,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub session_reused: bool,
}

/// Parameters for registering a session in the server database.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionRegisterRequest {
    pub session_id: String,
    pub project_id: i64,
    pub working_directory: String,
    pub git_branch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub git_worktree_path: String,
}

/// REST client for the vibeflow management server.
#[derive(Debug, Clone)]
pub struct VibeflowClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl VibeflowClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
        })
    }

    /// All non-archived projects.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.get("/rest/v1/vibeflow/projects").await
    }

    /// Create a project and return it.
    pub async fn create_project(&self, name: &str) -> Result<Project, ClientError> {
        self.post(
            "/rest/v1/vibeflow/projects",
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    /// Initialise a managed session; returns the server-issued session id
    /// and the initial agent prompt.
    pub async fn session_init(
        &self,
        req: &SessionInitRequest,
    ) -> Result<SessionInitResult, ClientError> {
        self.post("/rest/v1/vibeflow/sessions/init", req).await
    }

    /// Persist a session in the server database (best-effort).
    pub async fn session_register(&self, req: &SessionRegisterRequest) -> Result<(), ClientError> {
        let _: serde_json::Value = self.post("/rest/v1/vibeflow/sessions/register", req).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let mut req = self.http.get(format!("{}{}", self.base_url, path));
        if !self.token.is_empty() {
            req = req.bearer_auth(&self.token);
        }
        Self::decode(req.send().await?).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let mut req = self.http.post(format!("{}{}", self.base_url, path)).json(body);
        if !self.token.is_empty() {
            req = req.bearer_auth(&self.token);
        }
        Self::decode(req.send().await?).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

/// Probe server reachability with a short-timeout HEAD request.
pub async fn check_reachable(server_url: &str) -> Result<(), ClientError> {
    let http = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;
    let url = format!(
        "{}/rest/v1/vibeflow/projects",
        server_url.trim_end_matches('/')
    );
    http.head(url).send().await?;
    Ok(())
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
