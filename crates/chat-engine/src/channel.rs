//! Channel kinds and message types.

use serde::{Deserialize, Serialize};

/// The four channels of the chat panel.
///
/// Each kind carries its own fetch, seen-marking and compose behavior inside
/// the engine; `Notes` never touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Broadcast channel every authenticated user can read and write.
    Group,
    /// Admin-only broadcast channel.
    Admins,
    /// One two-sided ticket per non-admin user; admins see all mailboxes.
    Support,
    /// Local-only personal notes.
    Notes,
}

impl ChannelKind {
    /// Wire and storage-key name of the channel.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Group => "group",
            ChannelKind::Admins => "admins",
            ChannelKind::Support => "support",
            ChannelKind::Notes => "notes",
        }
    }

    /// Whether this channel is backed by the server at all.
    pub fn is_remote(self) -> bool {
        !matches!(self, ChannelKind::Notes)
    }

    /// Whether this kind holds an ordered message stream with an id cursor.
    pub fn is_stream(self) -> bool {
        matches!(self, ChannelKind::Group | ChannelKind::Admins)
    }

    /// Whether the given role may open this channel.
    pub fn available_to(self, admin: bool) -> bool {
        match self {
            ChannelKind::Admins => admin,
            _ => true,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The channel list offered to a user, admins first for admins.
pub fn channels_for(admin: bool) -> Vec<ChannelKind> {
    let base = [ChannelKind::Group, ChannelKind::Support, ChannelKind::Notes];
    if admin {
        let mut all = vec![ChannelKind::Admins];
        all.extend(base);
        all
    } else {
        base.to_vec()
    }
}

/// Who is using the engine.
#[derive(Debug, Clone)]
pub struct ChatIdentity {
    pub usuario: String,
    pub admin: bool,
}

impl ChatIdentity {
    pub fn new(usuario: impl Into<String>, admin: bool) -> Self {
        Self {
            usuario: usuario.into(),
            admin,
        }
    }
}

/// A group/admins channel message. Ids are server-assigned and monotonic;
/// messages are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    #[serde(default)]
    pub from_username: String,
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_channel_is_gated() {
        assert!(ChannelKind::Admins.available_to(true));
        assert!(!ChannelKind::Admins.available_to(false));
        assert!(ChannelKind::Group.available_to(false));
    }

    #[test]
    fn channel_list_depends_on_role() {
        assert_eq!(
            channels_for(false),
            vec![ChannelKind::Group, ChannelKind::Support, ChannelKind::Notes]
        );
        assert_eq!(
            channels_for(true),
            vec![
                ChannelKind::Admins,
                ChannelKind::Group,
                ChannelKind::Support,
                ChannelKind::Notes
            ]
        );
    }

    #[test]
    fn notes_is_the_only_local_channel() {
        for kind in channels_for(true) {
            assert_eq!(kind.is_remote(), kind != ChannelKind::Notes);
        }
    }
}
