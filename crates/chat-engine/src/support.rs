//! Support mailbox types.

use serde::{Deserialize, Serialize};

/// One user's support mailbox: a single editable message per side.
///
/// `user_text` belongs to the ticket's owner, `admin_text` to the admins;
/// saving overwrites the respective side, deleting clears it. The event ids
/// are monotonic counters the client compares against its seen markers to
/// detect "new since last seen" per side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportTicket {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub uid: i64,
    #[serde(default)]
    pub user_text: String,
    #[serde(default)]
    pub admin_text: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub user_event_id: i64,
    #[serde(default)]
    pub admin_event_id: i64,
    #[serde(default)]
    pub last_event_id: i64,
}

/// Highest `last_event_id` across a set of tickets; what an admin marks as
/// seen after looking at the mailbox list.
pub fn max_last_event<'a, I>(tickets: I) -> i64
where
    I: IntoIterator<Item = &'a SupportTicket>,
{
    tickets
        .into_iter()
        .map(|t| t.last_event_id)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_event_over_empty_list_is_zero() {
        let tickets: Vec<SupportTicket> = Vec::new();
        assert_eq!(max_last_event(&tickets), 0);
    }

    #[test]
    fn max_event_picks_the_newest_ticket() {
        let tickets = vec![
            SupportTicket {
                username: "ana".into(),
                last_event_id: 4,
                ..SupportTicket::default()
            },
            SupportTicket {
                username: "bob".into(),
                last_event_id: 9,
                ..SupportTicket::default()
            },
        ];
        assert_eq!(max_last_event(tickets.iter()), 9);
    }
}
