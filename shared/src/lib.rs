//! Shared types for the Ke Toan admin client
//!
//! Wire types exchanged with the accounting backend: list query descriptors,
//! the paginated response envelope, auth payloads and admin records.

pub mod client;
pub mod models;
pub mod query;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use query::{FilterDimension, FilterValue, QueryDescriptor, SortKey, SortOrder};
pub use response::{DataResponse, MessageResponse, PageEnvelope, PaginationMeta};
