//! Observable session state mirrored into durable storage.

pub mod vault;

pub use vault::{FileVault, MemoryVault, SessionVault, StoredSession};

use std::sync::{Arc, Weak};

use log::{debug, info};
use parking_lot::RwLock;
use roster_model::{Role, SessionState};

use crate::error::ClientResult;

/// Components notified when the session changes.
pub trait SessionSubscriber: Send + Sync {
    fn on_session_changed(&self, state: &SessionState);
}

/// In-memory session state backed by a [`SessionVault`].
///
/// The initial state is restored from the vault at construction; an
/// absent stored token means unauthenticated. There is no token refresh
/// or expiry check: a token stays valid until an explicit logout, which
/// clears both memory and storage.
pub struct SessionStore {
    state: RwLock<SessionState>,
    vault: Arc<dyn SessionVault>,
    subscribers: RwLock<Vec<Weak<dyn SessionSubscriber>>>,
}

impl SessionStore {
    /// Restore session state from the vault.
    pub fn new(vault: Arc<dyn SessionVault>) -> Self {
        let state = match vault.load() {
            Some(stored) => {
                debug!("[SessionStore] Restored session stored at {}", stored.stored_at);
                SessionState::authenticated(stored.token, stored.role)
            }
            None => SessionState::default(),
        };
        Self {
            state: RwLock::new(state),
            vault,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to session changes
    pub fn subscribe(&self, subscriber: Weak<dyn SessionSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    /// Current state, by value.
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Store a freshly granted token and role, in memory and durably.
    pub fn set_auth(&self, token: String, role: Role) -> ClientResult<()> {
        self.vault
            .store(&StoredSession::new(token.clone(), role))?;
        *self.state.write() = SessionState::authenticated(token, role);
        info!("[SessionStore] Session established for role {role}");
        self.notify();
        Ok(())
    }

    /// Clear the session from memory and durable storage.
    pub fn logout(&self) -> ClientResult<()> {
        self.vault.clear()?;
        *self.state.write() = SessionState::default();
        info!("[SessionStore] Session cleared");
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        let state = self.snapshot();
        self.subscribers.write().retain(|weak| {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_session_changed(&state);
                true
            } else {
                false
            }
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("is_authenticated", &self.is_authenticated())
            .field("subscriber_count", &self.subscribers.read().len())
            .finish()
    }
}
