// ketoan-client/src/session/store.rs
// Process-wide session store with change notifications

use std::sync::Arc;

use parking_lot::Mutex;
use shared::client::{AuthResponse, UserProfile};
use tokio::sync::broadcast;

use super::storage::{MemorySessionStorage, PersistedSession, SessionStorage};
use crate::error::ClientResult;

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login or registration succeeded
    Established,
    /// Access token replaced after a refresh
    TokenRefreshed,
    /// User logged out
    LoggedOut,
    /// Refresh failed; the client should route to `redirect_to`
    Terminated { redirect_to: String },
}

impl SessionEvent {
    /// The session is gone and in-flight work should stop.
    pub fn is_end(&self) -> bool {
        matches!(self, SessionEvent::LoggedOut | SessionEvent::Terminated { .. })
    }
}

/// Why a session is being torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    LoggedOut,
    Terminated,
}

/// Single injected owner of the auth session.
///
/// Reads always go to the underlying storage so every request sees the
/// latest token. Writes are serialized, so each login, refresh or logout is
/// one atomic step.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn SessionStorage>,
    login_path: String,
    write_lock: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("storage", &self.inner.storage)
            .field("login_path", &self.inner.login_path)
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, login_path: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                storage,
                login_path: login_path.into(),
                write_lock: Mutex::new(()),
                events,
            }),
        }
    }

    /// Memory-backed store
    pub fn in_memory(login_path: impl Into<String>) -> Self {
        Self::new(Arc::new(MemorySessionStorage::new()), login_path)
    }

    /// Login entry point announced when a session is terminated
    pub fn login_path(&self) -> &str {
        &self.inner.login_path
    }

    fn load(&self) -> PersistedSession {
        match self.inner.storage.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session storage");
                PersistedSession::default()
            }
        }
    }

    /// Current access token, read fresh from storage
    pub fn access_token(&self) -> Option<String> {
        self.load().access_token
    }

    /// Cached profile of the signed-in user
    pub fn user(&self) -> Option<UserProfile> {
        self.load().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist the token and profile returned by login or registration
    pub fn establish(&self, auth: &AuthResponse) -> ClientResult<()> {
        let _guard = self.inner.write_lock.lock();
        self.inner.storage.save(&PersistedSession {
            access_token: Some(auth.access_token.clone()),
            user: Some(auth.user.clone()),
        })?;
        tracing::info!(user = %auth.user.email, "Session established");
        self.emit(SessionEvent::Established);
        Ok(())
    }

    /// Replace the access token in place, keeping the cached profile
    pub fn replace_token(&self, token: impl Into<String>) -> ClientResult<()> {
        let _guard = self.inner.write_lock.lock();
        let mut session = self.inner.storage.load().unwrap_or_default();
        session.access_token = Some(token.into());
        self.inner.storage.save(&session)?;
        tracing::debug!("Access token refreshed");
        self.emit(SessionEvent::TokenRefreshed);
        Ok(())
    }

    /// Clear token and profile together, then notify subscribers
    pub fn end(&self, reason: EndReason) -> ClientResult<()> {
        let result = {
            let _guard = self.inner.write_lock.lock();
            self.inner.storage.clear()
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to clear session storage");
        }
        let event = match reason {
            EndReason::LoggedOut => {
                tracing::info!("Session ended by logout");
                SessionEvent::LoggedOut
            }
            EndReason::Terminated => {
                tracing::warn!(redirect_to = %self.inner.login_path, "Session terminated");
                SessionEvent::Terminated {
                    redirect_to: self.inner.login_path.clone(),
                }
            }
        };
        self.emit(event);
        result
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(token: &str) -> AuthResponse {
        AuthResponse {
            access_token: token.into(),
            refresh_token: None,
            user: UserProfile {
                id: "u1".into(),
                email: "minh@example.vn".into(),
                full_name: "Lê Minh".into(),
                role: "admin".into(),
                avatar: None,
            },
        }
    }

    #[test]
    fn establish_refresh_end() {
        let store = SessionStore::in_memory("/auth");
        let mut events = store.subscribe();
        assert!(!store.is_authenticated());

        store.establish(&auth("a1")).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("a1"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Established);

        store.replace_token("a2").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.user().unwrap().full_name, "Lê Minh");
        assert_eq!(events.try_recv().unwrap(), SessionEvent::TokenRefreshed);

        store.end(EndReason::Terminated).unwrap();
        assert!(store.access_token().is_none());
        assert!(store.user().is_none());
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Terminated {
                redirect_to: "/auth".into()
            }
        );
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::in_memory("/auth");
        let other = store.clone();
        store.establish(&auth("shared")).unwrap();
        assert_eq!(other.access_token().as_deref(), Some("shared"));

        other.end(EndReason::LoggedOut).unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn end_events_are_flagged() {
        assert!(SessionEvent::LoggedOut.is_end());
        assert!(SessionEvent::Terminated { redirect_to: "/auth".into() }.is_end());
        assert!(!SessionEvent::TokenRefreshed.is_end());
    }
}
