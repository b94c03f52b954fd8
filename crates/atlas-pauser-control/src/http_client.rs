//! HTTP client for the Atlas admin API.
//!
//! This module provides `HttpAtlasClient`, which calls the admin API
//! directly and answers its digest authentication challenge.

use async_trait::async_trait;
use atlas_pauser_core::{PauserError, Project, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::client::{AtlasClient, ProjectList};
use crate::config::Credentials;
use crate::digest::DigestChallenge;

const JSON: &str = "application/json";

/// HTTP client for the Atlas admin API.
#[derive(Debug, Clone)]
pub struct HttpAtlasClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

/// Error body returned by the admin API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorResponse {
    detail: Option<String>,
    error_code: Option<String>,
}

impl HttpAtlasClient {
    /// Create a new client.
    ///
    /// No timeouts are configured; the transport defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::Config` if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PauserError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, credentials))
    }

    /// Create a new client with a custom reqwest client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an API URL by appending path segments to the base URL.
    ///
    /// Segments are percent-encoded, so a `/` inside a resource name cannot
    /// address a different resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| {
            PauserError::Config(format!("invalid base URL {}: {reason}", self.base_url))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, answering a digest challenge once if one is issued.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let build = |authorization: Option<&str>| {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header(ACCEPT, JSON);
            if let Some(body) = body {
                request = request.json(body);
            }
            if let Some(authorization) = authorization {
                request = request.header(AUTHORIZATION, authorization);
            }
            request
        };

        let response = build(None).send().await.map_err(request_failed)?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .and_then(DigestChallenge::parse);
        let Some(challenge) = challenge else {
            return Ok(response);
        };

        let cnonce = Uuid::new_v4().simple().to_string();
        let authorization = challenge.authorization(
            self.credentials.public_key(),
            self.credentials.private_key(),
            method.as_str(),
            &request_uri(url),
            1,
            &cnonce,
        )?;

        tracing::debug!(method = %method, url = %url, realm = %challenge.realm, "Answering digest challenge");

        build(Some(&authorization))
            .send()
            .await
            .map_err(request_failed)
    }
}

fn request_failed(e: reqwest::Error) -> PauserError {
    PauserError::remote(e.status().map(|s| s.as_u16()), format!("request failed: {e}"))
}

/// The request target used in the digest computation.
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// Convert a non-success response into a remote error.
async fn error_from_response(response: reqwest::Response) -> PauserError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let detail = match serde_json::from_str::<ApiErrorResponse>(&text) {
        Ok(ApiErrorResponse {
            detail: Some(detail),
            error_code: Some(code),
        }) => format!("{code}: {detail}"),
        Ok(ApiErrorResponse {
            detail: Some(detail),
            error_code: None,
        }) => detail,
        Ok(ApiErrorResponse {
            detail: None,
            error_code: Some(code),
        }) => code,
        _ => text.trim().to_string(),
    };

    let message = if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    };

    PauserError::remote(Some(status.as_u16()), message)
}

#[async_trait]
impl AtlasClient for HttpAtlasClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(&["groups"])?;

        let response = self.send(Method::GET, &url, None).await?;

        if !response.status().is_success() {
            let error = error_from_response(response).await;
            tracing::error!(error = %error, "Failed to list projects");
            return Err(error);
        }

        let list: ProjectList = response
            .json()
            .await
            .map_err(|e| PauserError::remote(None, format!("failed to parse project list: {e}")))?;

        tracing::debug!(count = list.results.len(), "Listed projects");
        Ok(list.results)
    }

    async fn set_paused(&self, project: &Project, cluster: &str, paused: bool) -> Result<String> {
        let url = self.endpoint(&["groups", project.id.as_str(), "clusters", cluster])?;
        let body = serde_json::json!({ "paused": paused });

        let response = self.send(Method::PATCH, &url, Some(&body)).await?;

        if response.status().is_success() {
            tracing::debug!(project_id = %project.id, cluster = %cluster, paused, "Updated cluster");
            response
                .text()
                .await
                .map_err(|e| PauserError::remote(None, format!("failed to read response: {e}")))
        } else {
            let error = error_from_response(response).await;
            tracing::warn!(
                project_id = %project.id,
                cluster = %cluster,
                paused,
                error = %error,
                "Cluster update rejected"
            );
            Err(error)
        }
    }
}
