//! Session data types.

use serde::{Deserialize, Serialize};

/// Non-admin fallback level used whenever a stored or received level cannot
/// be parsed.
pub const DEFAULT_NIVEL: i64 = 1;

/// The authenticated identity for one tab.
///
/// An empty `token` means unauthenticated; `nivel == 0` marks an admin. The
/// account `estado` flows through from the backend verbatim ("pendiente",
/// "activo", "rechazado", "baneado").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub usuario: String,
    pub nivel: i64,
    pub estado: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.nivel == 0
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: String::new(),
            usuario: String::new(),
            nivel: DEFAULT_NIVEL,
            estado: String::new(),
        }
    }
}

/// Full replacement value for [`crate::SessionStore::set_session`].
///
/// Empty string fields clear their storage entry; `nivel` is always written.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub token: String,
    pub usuario: String,
    pub nivel: i64,
    pub estado: String,
}

impl SessionUpdate {
    /// The cleared state written on logout.
    pub fn cleared() -> Self {
        Self {
            nivel: DEFAULT_NIVEL,
            ..Self::default()
        }
    }
}
