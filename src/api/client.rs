//! HTTP client for the remote timer service

use anyhow::{bail, Result};
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::model::Timer;

use super::requests::{
    TimerCreationRequest, TimerCreationResponse, TimerUpdateRequest, TokenRequest, TokenResponse,
};

/// Thin wrapper around the service's REST endpoints
///
/// Holds no timer state; every call fetches or writes a full snapshot. The
/// polling tasks provide the retry cadence, so no retries happen here.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the current definition of a timer
    pub async fn get_timer(&self, id: &str) -> Result<Timer> {
        let url = format!("{}/timer/{}", self.base_url, id);
        debug!("GET {}", url);

        let resp = self.http.get(&url).send().await?;
        let resp = check_status(resp, &format!("fetch timer '{}'", id)).await?;

        Ok(resp.json().await?)
    }

    /// Exchange a timer id and password for a bearer token
    pub async fn login(&self, id: &str, password: &str) -> Result<String> {
        let url = format!("{}/timer/token", self.base_url);
        debug!("POST {}", url);

        let request = TokenRequest {
            id: id.to_string(),
            password: password.to_string(),
        };

        let resp = self.http.post(&url).json(&request).send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            bail!("wrong password for timer '{}'", id);
        }
        let resp = check_status(resp, &format!("log in to timer '{}'", id)).await?;

        let token: TokenResponse = resp.json().await?;
        Ok(token.token)
    }

    /// Create a new timer; returns the stored definition and a bearer token
    pub async fn create_timer(
        &self,
        request: &TimerCreationRequest,
    ) -> Result<TimerCreationResponse> {
        let url = format!("{}/timer", self.base_url);
        debug!("POST {}", url);

        let resp = self.http.post(&url).json(request).send().await?;
        if resp.status() == StatusCode::CONFLICT {
            bail!("a timer with id '{}' already exists", request.id);
        }
        let resp = check_status(resp, &format!("create timer '{}'", request.id)).await?;

        Ok(resp.json().await?)
    }

    /// Replace a timer's definition; requires a token from [`Self::login`]
    pub async fn update_timer(
        &self,
        id: &str,
        token: &str,
        request: &TimerUpdateRequest,
    ) -> Result<Timer> {
        let url = format!("{}/timer/{}", self.base_url, id);
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let resp = check_status(resp, &format!("update timer '{}'", id)).await?;

        Ok(resp.json().await?)
    }
}

/// Turn non-success responses into descriptive errors
async fn check_status(resp: Response, action: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if body.is_empty() {
        bail!("failed to {}: {}", action, status);
    }
    bail!("failed to {}: {} ({})", action, status, body);
}
