//! Admin data models
//!
//! Records returned by the `/admin/*` endpoints. Identifiers are the
//! backend's string ObjectIds (`_id` on the wire).

pub mod accountant;
pub mod business_owner;
pub mod invoice;
pub mod product;
pub mod stats;
pub mod storage_item;
pub mod user;

// Re-exports
pub use accountant::*;
pub use business_owner::*;
pub use invoice::*;
pub use product::*;
pub use stats::*;
pub use storage_item::*;
pub use user::*;
