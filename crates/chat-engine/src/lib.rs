//! Chat and support polling for the platino client.
//!
//! The portal shows up to four message channels under one panel: a broadcast
//! `group` channel, an admin-only `admins` channel, a one-ticket-per-user
//! `support` mailbox and a purely local `notes` list. This crate owns the
//! coordination: per-channel cursors, the active-window poll loop, the
//! background unread watcher, and the seen/unread bookkeeping that keeps
//! badges honest.
//!
//! The engine talks to the backend through the [`ChatTransport`] trait so it
//! can be driven by the real HTTP client or by a mock in tests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chat_engine::{
//!     ChannelKind, ChatEngine, ChatIdentity, ChatListQuery, ChatListResponse,
//!     ChatSendRequest, ChatSendResponse, ChatTransport, PollIntervals, TransportError,
//! };
//! use storage::Storage;
//!
//! struct NullTransport;
//!
//! #[async_trait::async_trait]
//! impl ChatTransport for NullTransport {
//!     async fn list(&self, _q: ChatListQuery) -> Result<ChatListResponse, TransportError> {
//!         Ok(ChatListResponse::default())
//!     }
//!     async fn send(&self, _r: ChatSendRequest) -> Result<ChatSendResponse, TransportError> {
//!         Ok(ChatSendResponse::default())
//!     }
//! }
//!
//! # async fn example() -> Result<(), chat_engine::ChatError> {
//! let storage = Storage::in_memory();
//! let identity = ChatIdentity::new("ana", false);
//! let engine = ChatEngine::new(Arc::new(NullTransport), identity, &storage, PollIntervals::default());
//!
//! engine.start_unread_watcher();
//! engine.open(ChannelKind::Group).await?;
//! engine.send_message("hola equipo").await?;
//! engine.close().await;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod notes;
pub mod poller;
pub mod support;
pub mod transport;
pub mod window;

pub use channel::{channels_for, ChannelKind, ChatIdentity, ChatMessage};
pub use cursor::{CursorStore, SupportSide};
pub use engine::{ChatEngine, ChatState, PollIntervals, StreamState, SupportState, UnreadFlags};
pub use error::ChatError;
pub use notes::{Note, NotesStore};
pub use poller::PollHandle;
pub use support::SupportTicket;
pub use transport::{
    ChatListQuery, ChatListResponse, ChatOp, ChatSendRequest, ChatSendResponse, ChatTransport,
    TransportError,
};
pub use window::{snap, Edge, Size, Viewport, WindowPos};
