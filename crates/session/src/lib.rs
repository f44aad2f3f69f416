//! Session state for the platino client.
//!
//! One [`SessionStore`] instance is created at application start and handed
//! by `Arc` to every consumer; there is no module-level singleton. The store
//! keeps a cheap stable snapshot (consumers detect "no change" with
//! `Arc::ptr_eq`), persists each field to tab storage, and notifies
//! subscribers synchronously on every mutation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use session::{SessionStore, SessionUpdate};
//! use storage::Storage;
//!
//! let store = Arc::new(SessionStore::new(Storage::in_memory()));
//! assert!(!store.snapshot().is_authenticated());
//!
//! store.set_session(SessionUpdate {
//!     token: "abc".into(),
//!     usuario: "ana".into(),
//!     nivel: 0,
//!     estado: "activo".into(),
//! });
//! assert!(store.snapshot().is_admin());
//!
//! store.logout();
//! assert!(store.snapshot().token.is_empty());
//! ```

pub mod lockout;
pub mod prefs;
pub mod store;
pub mod types;

pub use lockout::LoginLockout;
pub use prefs::Theme;
pub use store::{SessionStore, Subscription};
pub use types::{Session, SessionUpdate};
