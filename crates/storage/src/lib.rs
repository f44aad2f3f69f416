//! Client-side key/value persistence for the platino portal.
//!
//! The browser host gives the client two storage scopes: a tab-scoped store
//! that dies with the tab (session fields, chat cursors, personal notes) and
//! a shared store that survives across tabs (theme, floating-window
//! positions). This crate models both behind one [`KeyValueStore`] trait so
//! the rest of the workspace never talks to a concrete backend directly.
//!
//! Reads are lenient by design: a failed or unparseable read falls back to a
//! default instead of erroring, because storage problems must never take the
//! UI down. Writes are best-effort and logged on failure.
//!
//! # Example
//!
//! ```
//! use storage::{Storage, keys};
//!
//! let storage = Storage::in_memory();
//! storage.tab().set(keys::TOKEN, "abc123");
//! assert_eq!(storage.tab().get(keys::TOKEN).as_deref(), Some("abc123"));
//!
//! storage.tab().remove_prefix(keys::NOTES_PREFIX);
//! ```

pub mod error;
pub mod keys;
pub mod store;

pub use error::StorageError;
pub use store::{KeyValueStore, MemoryStore, Storage, Store};
