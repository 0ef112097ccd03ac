// reqwest implementation of the forum API

use async_trait::async_trait;
use quorum_types::{
    AuthResponse, CreateReplyRequest, CreateThreadRequest, Credentials, Reply, SearchParams, Tag,
    Thread,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::error::{ForumError, Result};
use crate::traits::ForumApi;

/// Forum API client (HTTP direct, JSON bodies, optional bearer token)
pub struct HttpForumClient {
    http_client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpForumClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            ForumError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ForumError::Config(format!(
                "Base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ForumError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            token: RwLock::new(config.token),
        })
    }

    /// Client against `base_url` with default timeout and no token
    pub fn from_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// `POST /auth/login`; the returned token is used for every later request
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let url = self.endpoint(&["auth", "login"])?;
        tracing::debug!(email = %credentials.email, "Logging in");

        let response: AuthResponse = self
            .execute(self.http_client.post(url).json(credentials))
            .await?;
        self.set_token(Some(response.token.clone())).await;

        tracing::info!("Login succeeded");
        Ok(response)
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ForumError::Config(format!("Base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach auth, send, check status, decode the JSON body
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                path = %url,
                "Forum API request failed: {}",
                body
            );
            return Err(ForumError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), path = %url, "Forum API request successful");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ForumApi for HttpForumClient {
    async fn search_threads(&self, params: &SearchParams) -> Result<Vec<Thread>> {
        let url = self.endpoint(&["forum", "threads", "search"])?;
        let request = self.http_client.get(url).query(&params.to_query_pairs());
        self.execute(request).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let url = self.endpoint(&["forum", "tags"])?;
        self.execute(self.http_client.get(url)).await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Thread> {
        let url = self.endpoint(&["forum", "threads", thread_id])?;
        self.execute(self.http_client.get(url)).await
    }

    async fn list_replies(&self, thread_id: &str) -> Result<Vec<Reply>> {
        let url = self.endpoint(&["forum", "threads", thread_id, "replies"])?;
        self.execute(self.http_client.get(url)).await
    }

    async fn create_reply(&self, thread_id: &str, request: &CreateReplyRequest) -> Result<Reply> {
        let url = self.endpoint(&["forum", "threads", thread_id, "replies"])?;
        self.execute(self.http_client.post(url).json(request)).await
    }

    async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread> {
        let url = self.endpoint(&["forum", "threads"])?;
        self.execute(self.http_client.post(url).json(request)).await
    }
}
