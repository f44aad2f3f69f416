//! Per-user channel cursors.

use chrono::Utc;
use storage::{keys, Store};

use crate::channel::ChannelKind;

/// Which side of a support ticket a seen marker tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportSide {
    /// A non-admin watching for admin replies.
    User,
    /// An admin watching the mailbox list.
    Admin,
}

impl SupportSide {
    pub fn as_str(self) -> &'static str {
        match self {
            SupportSide::User => "user",
            SupportSide::Admin => "admin",
        }
    }
}

/// Join timestamps and seen markers for one user, backed by tab storage.
///
/// The join timestamp is fixed the first time a channel is touched in this
/// tab session and reused thereafter, so a user never sees history predating
/// their join. Seen markers only ever advance.
#[derive(Debug, Clone)]
pub struct CursorStore {
    tab: Store,
    usuario: String,
}

impl CursorStore {
    pub fn new(tab: Store, usuario: impl Into<String>) -> Self {
        Self {
            tab,
            usuario: usuario.into(),
        }
    }

    /// The channel's join timestamp, set on first access.
    pub fn join_ts(&self, channel: ChannelKind) -> i64 {
        let key = keys::chat_join(&self.usuario, channel.as_str());
        let existing = self.tab.get_number(&key, 0);
        if existing > 0 {
            return existing;
        }
        let now = Utc::now().timestamp();
        self.tab.set_number(&key, now);
        now
    }

    /// Last message id marked seen on a stream channel.
    pub fn seen(&self, channel: ChannelKind) -> i64 {
        self.tab
            .get_number(&keys::chat_seen(&self.usuario, channel.as_str()), 0)
    }

    /// Advance the seen marker; older ids are ignored.
    pub fn mark_seen(&self, channel: ChannelKind, id: i64) {
        let key = keys::chat_seen(&self.usuario, channel.as_str());
        let current = self.tab.get_number(&key, 0);
        if id > current {
            self.tab.set_number(&key, id);
        }
    }

    /// Last support event marked seen for a side.
    pub fn support_seen(&self, side: SupportSide) -> i64 {
        self.tab
            .get_number(&keys::support_seen(&self.usuario, side.as_str()), 0)
    }

    /// Advance a support seen marker; older events are ignored.
    pub fn mark_support_seen(&self, side: SupportSide, event_id: i64) {
        let key = keys::support_seen(&self.usuario, side.as_str());
        let current = self.tab.get_number(&key, 0);
        if event_id > current {
            self.tab.set_number(&key, event_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_timestamp_is_fixed_per_session() {
        let cursors = CursorStore::new(Store::memory(), "ana");
        let first = cursors.join_ts(ChannelKind::Group);
        let second = cursors.join_ts(ChannelKind::Group);
        assert!(first > 0);
        assert_eq!(first, second);
    }

    #[test]
    fn join_timestamps_are_per_channel() {
        let tab = Store::memory();
        tab.set_number(&keys::chat_join("ana", "group"), 111);
        let cursors = CursorStore::new(tab, "ana");
        assert_eq!(cursors.join_ts(ChannelKind::Group), 111);
        assert_ne!(cursors.join_ts(ChannelKind::Admins), 111);
    }

    #[test]
    fn seen_marker_never_regresses() {
        let cursors = CursorStore::new(Store::memory(), "ana");
        cursors.mark_seen(ChannelKind::Group, 42);
        cursors.mark_seen(ChannelKind::Group, 17);
        assert_eq!(cursors.seen(ChannelKind::Group), 42);

        cursors.mark_seen(ChannelKind::Group, 43);
        assert_eq!(cursors.seen(ChannelKind::Group), 43);
    }

    #[test]
    fn support_sides_are_independent() {
        let cursors = CursorStore::new(Store::memory(), "ana");
        cursors.mark_support_seen(SupportSide::User, 5);
        assert_eq!(cursors.support_seen(SupportSide::User), 5);
        assert_eq!(cursors.support_seen(SupportSide::Admin), 0);
    }
}
