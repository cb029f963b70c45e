//! HTTP client for the cookbook document API.

pub mod recipes;
mod remote;
pub mod users;

use std::time::Duration;

use crate::error::{ClientError, Result};

/// HTTP client for the cookbook document API.
///
/// The bearer token, when set, is the acting identity for every write.
#[derive(Debug, Clone)]
pub struct CookbookClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CookbookClient {
    /// Create a new client with the given base URL and request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Sign requests with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, attaching the bearer token if any.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Decode a success body or classify the error status.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            Err(error_from_response(response, resource).await)
        }
    }

    /// Handle responses where no body is expected.
    async fn handle_empty_response(&self, response: reqwest::Response, resource: &str) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response, resource).await)
        }
    }
}

async fn error_from_response(response: reqwest::Response, resource: &str) -> ClientError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::debug!(status, resource, "Remote returned an error status");
    ClientError::from_status(status, resource, message)
}
