//! Typed API services
//!
//! Thin wrappers over [`HttpClient`](crate::http::HttpClient) for the
//! `/auth/*` and `/admin/*` endpoints.

mod admin;
mod auth;

pub use admin::AdminApi;
pub use auth::AuthApi;
