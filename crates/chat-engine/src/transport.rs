//! The backend seam the engine polls through.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::channel::{ChannelKind, ChatMessage};
use crate::support::SupportTicket;

/// Query for a channel fetch.
///
/// Streams use `since_id`/`since_ts` to request strictly-newer messages;
/// the support channel uses `usuario` when an admin asks for one specific
/// mailbox, and neither cursor field.
#[derive(Debug, Clone)]
pub struct ChatListQuery {
    pub channel: ChannelKind,
    pub since_id: Option<i64>,
    pub since_ts: Option<i64>,
    pub limit: Option<u32>,
    pub usuario: Option<String>,
}

impl ChatListQuery {
    /// Stream fetch for group/admins.
    pub fn stream(channel: ChannelKind, since_id: i64, since_ts: i64, limit: u32) -> Self {
        Self {
            channel,
            since_id: Some(since_id),
            since_ts: Some(since_ts),
            limit: Some(limit),
            usuario: None,
        }
    }

    /// A non-admin's own support ticket.
    pub fn own_ticket() -> Self {
        Self {
            channel: ChannelKind::Support,
            since_id: None,
            since_ts: None,
            limit: None,
            usuario: None,
        }
    }

    /// The full mailbox list, admin view.
    pub fn ticket_list(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::own_ticket()
        }
    }

    /// One user's ticket, admin view.
    pub fn ticket_for(usuario: impl Into<String>) -> Self {
        Self {
            usuario: Some(usuario.into()),
            ..Self::own_ticket()
        }
    }
}

/// Mutation op carried by a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOp {
    /// Clear the sender's side of a support ticket.
    Delete,
}

impl ChatOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatOp::Delete => "delete",
        }
    }
}

/// A message post or support-side save/delete.
#[derive(Debug, Clone)]
pub struct ChatSendRequest {
    pub channel: ChannelKind,
    pub text: Option<String>,
    pub op: Option<ChatOp>,
    /// Target mailbox owner when an admin writes a support reply.
    pub usuario: Option<String>,
}

impl ChatSendRequest {
    pub fn message(channel: ChannelKind, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: Some(text.into()),
            op: None,
            usuario: None,
        }
    }

    pub fn support_save(text: impl Into<String>, usuario: Option<String>) -> Self {
        Self {
            channel: ChannelKind::Support,
            text: Some(text.into()),
            op: None,
            usuario,
        }
    }

    pub fn support_delete(usuario: Option<String>) -> Self {
        Self {
            channel: ChannelKind::Support,
            text: None,
            op: Some(ChatOp::Delete),
            usuario,
        }
    }
}

/// What a channel fetch returns; the backend fills whichever fields the
/// channel kind produces.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatListResponse {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub tickets: Vec<SupportTicket>,
    #[serde(default)]
    pub ticket: Option<SupportTicket>,
}

/// What a send returns; support operations echo the updated ticket.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatSendResponse {
    #[serde(default)]
    pub ticket: Option<SupportTicket>,
}

/// A failed backend call, reduced to what the engine needs: the HTTP status
/// (0 when no response arrived at all) and a display message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub status: u16,
    pub message: String,
}

impl TransportError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Statuses on which a poll loop must stop permanently instead of
    /// retrying: the backend said the operation is forbidden or broken.
    pub fn is_hard_stop(&self) -> bool {
        matches!(self.status, 403 | 500)
    }

    /// No HTTP response at all (unreachable or timed out).
    pub fn is_no_response(&self) -> bool {
        self.status == 0
    }
}

/// How the engine reaches the chat backend.
#[async_trait]
pub trait ChatTransport: Send + Sync + 'static {
    async fn list(&self, query: ChatListQuery) -> Result<ChatListResponse, TransportError>;
    async fn send(&self, request: ChatSendRequest) -> Result<ChatSendResponse, TransportError>;
}
