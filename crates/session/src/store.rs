//! The session store.

use std::sync::{Arc, Mutex, Weak};

use storage::{keys, Storage};
use tracing::{debug, info};

use crate::types::{Session, SessionUpdate, DEFAULT_NIVEL};

type Callback = Arc<dyn Fn(&Session) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    entries: Vec<(u64, Callback)>,
    next_id: u64,
}

/// Process-wide authentication state backed by tab storage.
///
/// Construct one per application and share it by `Arc`. All mutation goes
/// through [`set_session`](Self::set_session) / [`logout`](Self::logout);
/// both persist first and then notify every subscriber synchronously.
pub struct SessionStore {
    storage: Storage,
    snapshot: Mutex<Arc<Session>>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl SessionStore {
    /// Create the store, loading any session the tab already holds.
    pub fn new(storage: Storage) -> Self {
        let initial = Arc::new(load_session(&storage));
        Self {
            storage,
            snapshot: Mutex::new(initial),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    /// Current session. The returned `Arc` is stable until the next
    /// mutation, so subscribers can detect "no change" with `Arc::ptr_eq`.
    pub fn snapshot(&self) -> Arc<Session> {
        lock(&self.snapshot).clone()
    }

    /// Access to the storage scopes this store persists into.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Replace the session. Each field is persisted independently: empty
    /// strings remove their entry, `nivel` is always written. Subscribers
    /// are notified after the snapshot is rebuilt.
    pub fn set_session(&self, update: SessionUpdate) {
        let tab = self.storage.tab();

        if update.token.is_empty() {
            tab.remove(keys::TOKEN);
        } else {
            tab.set(keys::TOKEN, &update.token);
        }

        if update.usuario.is_empty() {
            tab.remove(keys::USUARIO);
        } else {
            tab.set(keys::USUARIO, &update.usuario);
        }

        tab.set_number(keys::NIVEL, update.nivel);

        if update.estado.is_empty() {
            tab.remove(keys::ESTADO);
        } else {
            tab.set(keys::ESTADO, &update.estado);
        }

        // Snapshot reads back from storage so that a backend that rejected a
        // write still agrees with what subscribers observe.
        let next = Arc::new(load_session(&self.storage));
        *lock(&self.snapshot) = next.clone();
        self.notify(&next);
    }

    /// Clear the session and every per-login tab cache (notes, chat join
    /// timestamps, seen markers), then notify subscribers.
    pub fn logout(&self) {
        let tab = self.storage.tab();
        for prefix in keys::SESSION_PREFIXES {
            tab.remove_prefix(prefix);
        }
        info!("session cleared");
        self.set_session(SessionUpdate::cleared());
    }

    /// Register a callback invoked on every publish. The subscription ends
    /// when the returned guard is dropped or `unsubscribe()` is called.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let mut subs = lock(&self.subscribers);
        let id = subs.next_id;
        subs.next_id += 1;
        subs.entries.push((id, Arc::new(callback)));
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    fn notify(&self, session: &Session) {
        // Clone the callback list out so a subscriber may re-enter the store
        // (subscribe, snapshot) without deadlocking.
        let callbacks: Vec<Callback> = {
            let subs = lock(&self.subscribers);
            subs.entries.iter().map(|(_, cb)| cb.clone()).collect()
        };
        debug!("notifying {} session subscribers", callbacks.len());
        for cb in callbacks {
            cb(session);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.snapshot())
            .finish()
    }
}

/// Guard for one session subscription; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    /// Remove the subscription now instead of on drop.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subs) = self.subscribers.upgrade() {
            if let Ok(mut subs) = subs.lock() {
                subs.entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

// A poisoned lock only means a subscriber panicked mid-notify; session
// state itself is still coherent, so keep serving it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn load_session(storage: &Storage) -> Session {
    let tab = storage.tab();
    Session {
        token: tab.get(keys::TOKEN).unwrap_or_default(),
        usuario: tab.get(keys::USUARIO).unwrap_or_default(),
        nivel: tab.get_number(keys::NIVEL, DEFAULT_NIVEL),
        estado: tab.get(keys::ESTADO).unwrap_or_default(),
    }
}
