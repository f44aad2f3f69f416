//! Storage key naming.
//!
//! Every key the client persists is declared here so that prefix-based
//! cleanup (logout) and cross-crate agreement on names stay in one place.
//! Per-user keys append the trimmed username to a fixed prefix; channel and
//! side qualifiers are colon-separated.

/// Session token (tab scope).
pub const TOKEN: &str = "platino_token";
/// Session username (tab scope).
pub const USUARIO: &str = "platino_usuario";
/// Session level, `0` means admin (tab scope).
pub const NIVEL: &str = "platino_nivel";
/// Session account status (tab scope).
pub const ESTADO: &str = "platino_estado";

/// Theme preference (shared scope).
pub const TEMA: &str = "platino_tema";

/// Per-user local notes list (tab scope).
pub const NOTES_PREFIX: &str = "platino_notes:";
/// Per-user, per-channel join timestamp (tab scope).
pub const CHAT_JOIN_PREFIX: &str = "platino_chat_join:";
/// Per-user, per-channel last-seen message id (tab scope).
pub const CHAT_SEEN_PREFIX: &str = "platino_chat_seen:";
/// Per-user, per-side support seen event counter (tab scope).
pub const SUPPORT_SEEN_PREFIX: &str = "platino_support_seen:";
/// Per-channel floating window position (shared scope).
pub const CHAT_WIN_POS_PREFIX: &str = "platino_chat_win_pos:";

/// Tab-scope prefixes that belong to one login and are wiped on logout.
pub const SESSION_PREFIXES: [&str; 4] = [
    NOTES_PREFIX,
    CHAT_JOIN_PREFIX,
    CHAT_SEEN_PREFIX,
    SUPPORT_SEEN_PREFIX,
];

/// Key for a user's local notes.
pub fn notes(usuario: &str) -> String {
    format!("{}{}", NOTES_PREFIX, usuario.trim())
}

/// Key for a user's join timestamp on a channel.
pub fn chat_join(usuario: &str, channel: &str) -> String {
    format!("{}{}:{}", CHAT_JOIN_PREFIX, usuario.trim(), channel)
}

/// Key for a user's last-seen message id on a channel.
pub fn chat_seen(usuario: &str, channel: &str) -> String {
    format!("{}{}:{}", CHAT_SEEN_PREFIX, usuario.trim(), channel)
}

/// Key for a user's support seen marker; `side` is `"user"` or `"admin"`.
pub fn support_seen(usuario: &str, side: &str) -> String {
    format!("{}{}:{}", SUPPORT_SEEN_PREFIX, usuario.trim(), side)
}

/// Key for a channel's floating window position.
pub fn chat_win_pos(channel: &str) -> String {
    format!("{}{}", CHAT_WIN_POS_PREFIX, channel)
}
