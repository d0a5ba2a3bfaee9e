//! Ke Toan Client - admin client core for the accounting backend
//!
//! Provides the authenticated request pipeline (bearer token, one-shot
//! refresh on 401) and a generic paginated query controller for the admin
//! list views.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod list;
pub mod pagination;
pub mod session;
pub mod views;

pub use api::{AdminApi, AuthApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiRequest, HttpClient, NetworkHttpClient};
pub use list::{
    Endpoint, FetchOutcome, FetchTicket, ListSnapshot, ListSource, ListView, LoadStatus,
    QueryController,
};
pub use pagination::{PageLink, PaginationView, page_window};
pub use session::{SessionEvent, SessionStore};

// Re-export shared types for convenience
pub use shared::client::{AuthResponse, UserProfile};
pub use shared::query::{FilterDimension, QueryDescriptor, SortKey, SortOrder};
pub use shared::response::{PageEnvelope, PaginationMeta};
