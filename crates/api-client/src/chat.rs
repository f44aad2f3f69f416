//! The chat transport: how the polling engine reaches the backend.

use async_trait::async_trait;
use chat_engine::{
    ChatListQuery, ChatListResponse, ChatSendRequest, ChatSendResponse, ChatTransport,
    TransportError,
};
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;

/// `POST /api/chat/send/` body.
#[derive(Debug, Serialize)]
struct ChatSendBody<'a> {
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usuario: Option<&'a str>,
}

/// Query pairs for `GET /api/chat/`, empty fields omitted.
fn list_params(query: &ChatListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("channel", query.channel.as_str().to_string())];
    if let Some(since_id) = query.since_id {
        params.push(("since_id", since_id.to_string()));
    }
    if let Some(since_ts) = query.since_ts {
        params.push(("since_ts", since_ts.to_string()));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(usuario) = &query.usuario {
        params.push(("usuario", usuario.clone()));
    }
    params
}

impl From<ApiError> for TransportError {
    fn from(e: ApiError) -> Self {
        TransportError::new(e.status(), e.to_string())
    }
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn list(&self, query: ChatListQuery) -> Result<ChatListResponse, TransportError> {
        self.get("/api/chat/", Some(&list_params(&query)))
            .await
            .map_err(TransportError::from)
    }

    async fn send(&self, request: ChatSendRequest) -> Result<ChatSendResponse, TransportError> {
        let body = ChatSendBody {
            channel: request.channel.as_str(),
            text: request.text.as_deref(),
            op: request.op.map(|op| op.as_str()),
            usuario: request.usuario.as_deref(),
        };
        self.post("/api/chat/send/", &body)
            .await
            .map_err(TransportError::from)
    }
}

#[cfg(test)]
mod tests {
    use chat_engine::ChannelKind;

    use super::*;

    #[test]
    fn stream_query_carries_cursor_fields() {
        let query = ChatListQuery::stream(ChannelKind::Group, 42, 1_700_000_000, 200);
        assert_eq!(
            list_params(&query),
            vec![
                ("channel", "group".to_string()),
                ("since_id", "42".to_string()),
                ("since_ts", "1700000000".to_string()),
                ("limit", "200".to_string()),
            ]
        );
    }

    #[test]
    fn own_ticket_query_is_channel_only() {
        let query = ChatListQuery::own_ticket();
        assert_eq!(list_params(&query), vec![("channel", "support".to_string())]);
    }

    #[test]
    fn admin_ticket_query_names_the_mailbox() {
        let query = ChatListQuery::ticket_for("bob");
        let params = list_params(&query);
        assert!(params.contains(&("usuario", "bob".to_string())));
    }

    #[test]
    fn send_body_omits_absent_fields() {
        let body = ChatSendBody {
            channel: "support",
            text: None,
            op: Some("delete"),
            usuario: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"channel": "support", "op": "delete"}));
    }
}
