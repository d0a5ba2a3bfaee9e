// ketoan-client/src/session/mod.rs
// Session state: durable token storage and the process-wide session store

pub mod storage;
pub mod store;

pub use storage::{FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage};
pub use store::{EndReason, SessionEvent, SessionStore};
