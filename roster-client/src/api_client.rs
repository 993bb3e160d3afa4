//! Authenticated HTTP wrapper around the collection server.
//!
//! Thin layer over reqwest: URL building, bearer-token injection, and
//! the mapping from response statuses into [`ClientError`]. There is no
//! token refresh; a 401 clears the in-memory token and surfaces
//! [`ClientError::Unauthorized`].

use std::sync::Arc;

use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Response header carrying the full matching row count for list queries.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// API client with authentication support
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        debug!(
            "[ApiClient] Creating new API client with base URL: {}",
            config.base_url
        );

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_store: Arc::new(RwLock::new(None)),
        }
    }

    /// Build an absolute URL for a server path
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the session token attached to subsequent requests
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// Get the current session token
    pub async fn get_token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Build a request with the authorization header when a token is present
    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.header("Authorization", format!("Bearer {token}"))
        } else {
            builder
        }
    }

    /// Execute a request and decode a JSON body, mapping common errors
    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Deserialization(e.to_string()));
        }

        Err(self.map_failure(status, response).await)
    }

    async fn map_failure(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED => {
                // No refresh flow by design; force a fresh login.
                self.set_token(None).await;
                ClientError::Unauthorized
            }
            StatusCode::NOT_FOUND => {
                ClientError::NotFound(response.url().path().to_string())
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                ClientError::Status {
                    status: status.as_u16(),
                    body,
                }
            }
        }
    }

    /// GET request with authentication
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {url}");

        let request = self.client.get(&url);
        let request = self.build_request(request).await;
        self.execute_json(request).await
    }

    /// GET request with query parameters, returning the decoded body
    /// alongside the raw `X-Total-Count` header value if present
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<(T, Option<String>)> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {url} with {} query params", query.len());

        let request = self.client.get(&url).query(query);
        let request = self.build_request(request).await;

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.map_failure(status, response).await);
        }

        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Deserialization(e.to_string()))?;

        Ok((body, total_count))
    }

    /// POST request with authentication
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        let url = self.build_url(path);
        debug!("[ApiClient] POST {url}");

        let request = self.client.post(&url).json(body);
        let request = self.build_request(request).await;
        self.execute_json(request).await
    }

    /// PATCH request with authentication
    pub async fn patch<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        let url = self.build_url(path);
        debug!("[ApiClient] PATCH {url}");

        let request = self.client.patch(&url).json(body);
        let request = self.build_request(request).await;
        self.execute_json(request).await
    }

    /// DELETE request for endpoints that return no content
    pub async fn delete_no_content(&self, path: &str) -> ClientResult<()> {
        let url = self.build_url(path);
        debug!("[ApiClient] DELETE {url}");

        let request = self.client.delete(&url);
        let request = self.build_request(request).await;

        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => Err(self.map_failure(status, response).await),
        }
    }
}
