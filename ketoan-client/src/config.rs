//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;

use shared::query::DEFAULT_PAGE_SIZE;

use crate::error::ClientResult;
use crate::http::NetworkHttpClient;
use crate::session::{FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStore};

/// Client configuration for connecting to the accounting backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | API_BASE_URL | http://localhost:3001/api | Backend base path |
/// | REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
/// | LOGIN_PATH | /auth | Login entry point announced on session end |
/// | SESSION_FILE | (unset, in-memory) | Durable session file |
/// | PAGE_SIZE | 10 | Default list page size |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, all endpoints are relative to it
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Client-side login entry point
    pub login_path: String,

    /// Where the session is persisted. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,

    /// Page size for list views
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            login_path: "/auth".to_string(),
            session_file: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::new(
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3001/api".into()),
        );
        Self {
            timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            login_path: std::env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            session_file: std::env::var("SESSION_FILE").ok().map(PathBuf::from),
            page_size: std::env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            base_url: defaults.base_url,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the login entry point
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Persist the session to a JSON file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Set the list page size
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Build the session store described by this configuration
    pub fn build_session_store(&self) -> SessionStore {
        let storage: Arc<dyn SessionStorage> = match &self.session_file {
            Some(path) => Arc::new(FileSessionStorage::new(path)),
            None => Arc::new(MemorySessionStorage::new()),
        };
        SessionStore::new(storage, self.login_path.clone())
    }

    /// Create the authenticated HTTP client from this configuration
    pub fn build_http_client(&self, session: SessionStore) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self, session)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
