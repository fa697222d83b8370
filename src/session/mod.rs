// src/session/mod.rs — Server-held credential state, one per connected client
//
// The token pair is owned exclusively by the gateway side: created on a
// successful code exchange, rotated in place on refresh, destroyed on logout.
// Nothing is persisted across restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// OAuth token pair for one authenticated upstream account.
#[derive(Debug, Clone)]
pub struct Session {
    /// Short-lived, opaque.
    pub access_token: String,
    /// Long-lived, opaque. Rotated when the provider issues a new one.
    pub refresh_token: String,
}

/// Keyed session storage. Call sites never touch the backing directly, so a
/// cache- or database-backed store can replace the memory one without
/// touching them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, sid: &str) -> Option<Session>;
    async fn set(&self, sid: &str, session: Session);
    async fn clear(&self, sid: &str);
}

/// In-memory store. Tokens race between a primary call and its one-shot
/// refresh path are last-write-wins, acceptable under the single-client
/// deployment model.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, sid: &str) -> Option<Session> {
        self.inner.read().await.get(sid).cloned()
    }

    async fn set(&self, sid: &str, session: Session) {
        self.inner.write().await.insert(sid.to_string(), session);
    }

    async fn clear(&self, sid: &str) {
        self.inner.write().await.remove(sid);
    }
}

/// The session id the gesture pipeline acts on behalf of — the most recently
/// authenticated client. Single-client deployment; the last login wins.
#[derive(Clone, Default)]
pub struct ActiveSession(Arc<RwLock<Option<String>>>);

impl ActiveSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<String> {
        self.0.read().await.clone()
    }

    pub async fn set(&self, sid: &str) {
        *self.0.write().await = Some(sid.to_string());
    }

    /// Clear only if the active session is the one being logged out.
    pub async fn clear_if(&self, sid: &str) {
        let mut guard = self.0.write().await;
        if guard.as_deref() == Some(sid) {
            *guard = None;
        }
    }
}
