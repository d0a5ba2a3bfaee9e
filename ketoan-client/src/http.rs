//! Authenticated request pipeline
//!
//! Every call goes through [`NetworkHttpClient::send_json`], which attaches
//! the current bearer token and recovers once from an expired access token
//! by calling `/auth/refresh`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use reqwest::cookie::Jar;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::client::RefreshResponse;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{EndReason, SessionStore};

const REFRESH_PATH: &str = "auth/refresh";

/// One logical API request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Public endpoint: no bearer token, and a 401 is final
    pub anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Send without credentials and skip the refresh-and-retry step.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Per-request retry bookkeeping. Lives on the stack of a single
/// `send_json` call, so concurrent requests never share it.
#[derive(Debug, Default, Clone, Copy)]
struct RequestContext {
    retried: bool,
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the decoded JSON body
    async fn send_json(&self, request: ApiRequest) -> ClientResult<Value>;

    /// Session the client authenticates with
    fn session(&self) -> &SessionStore;

    fn base_url(&self) -> &str;
}

/// Decode a JSON body into `T`
pub fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("unexpected response shape: {e}")))
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    /// Bare client for `/auth/refresh`. Shares the cookie jar so the
    /// refresh cookie set at login is sent along.
    refresh_client: Client,
    base_url: String,
    session: SessionStore,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ClientResult<Self> {
        let jar = Arc::new(Jar::default());
        let timeout = Duration::from_secs(config.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;
        let refresh_client = Client::builder()
            .timeout(timeout)
            .cookie_provider(jar)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build refresh client: {e}")))?;
        Ok(Self {
            client,
            refresh_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET and decode
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        decode(self.send_json(ApiRequest::get(path)).await?)
    }

    /// Issue one attempt of `request`, with `token` as bearer credential.
    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> ClientResult<Value> {
        let url = self.url(&request.path);
        let mut req = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        if let Some(token) = token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }

        tracing::debug!(method = %request.method, url = %url, "Sending request");
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::from_status(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Call the refresh endpoint outside the pipeline.
    ///
    /// `Ok(true)` means a new token was persisted, `Ok(false)` means the
    /// server answered without a token. A failed refresh ends the session.
    async fn refresh_access_token(&self) -> ClientResult<bool> {
        tracing::debug!("Access token rejected, refreshing");
        match self.request_refresh().await {
            Ok(Some(token)) => {
                self.session.replace_token(token)?;
                Ok(true)
            }
            Ok(None) => {
                tracing::warn!("Refresh response carried no access token");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                // end() already logs a storage failure; the refresh error is what callers see
                let _ = self.session.end(EndReason::Terminated);
                Err(ClientError::SessionTerminated(Box::new(e)))
            }
        }
    }

    async fn request_refresh(&self) -> ClientResult<Option<String>> {
        let response = self
            .refresh_client
            .post(self.url(REFRESH_PATH))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body: RefreshResponse = match Self::handle_response(response).await? {
            Value::Null => RefreshResponse::default(),
            value => serde_json::from_value(value)?,
        };
        Ok(body.access_token.filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn send_json(&self, request: ApiRequest) -> ClientResult<Value> {
        let mut ctx = RequestContext::default();
        loop {
            // Read the token fresh for every attempt
            let token = if request.anonymous {
                None
            } else {
                self.session.access_token()
            };
            match self.dispatch(&request, token.as_deref()).await {
                Err(ClientError::Unauthorized(message)) if !ctx.retried && !request.anonymous => {
                    ctx.retried = true;
                    if !self.refresh_access_token().await? {
                        return Err(ClientError::Unauthorized(message));
                    }
                    tracing::debug!(path = %request.path, "Retrying with refreshed token");
                }
                Err(ClientError::Forbidden(message)) => {
                    tracing::warn!(path = %request.path, "Access forbidden - insufficient permissions");
                    return Err(ClientError::Forbidden(message));
                }
                other => return other,
            }
        }
    }

    fn session(&self) -> &SessionStore {
        &self.session
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
