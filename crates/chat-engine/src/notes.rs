//! The local-only notes channel.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use storage::{keys, Store};

/// One personal note. Never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub ts: i64,
    pub text: String,
}

/// Per-user note list in tab storage; wiped by logout's prefix cleanup and
/// never synchronized across tabs or devices.
#[derive(Debug, Clone)]
pub struct NotesStore {
    tab: Store,
    usuario: String,
}

impl NotesStore {
    pub fn new(tab: Store, usuario: impl Into<String>) -> Self {
        Self {
            tab,
            usuario: usuario.into(),
        }
    }

    /// Load the notes; a missing or malformed entry reads as empty.
    pub fn load(&self) -> Vec<Note> {
        self.tab
            .get_json(&keys::notes(&self.usuario))
            .unwrap_or_default()
    }

    /// Append a note, returning the updated list. Blank text is ignored.
    pub fn append(&self, text: &str) -> Vec<Note> {
        let trimmed = text.trim();
        let mut notes = self.load();
        if trimmed.is_empty() {
            return notes;
        }
        notes.push(Note {
            ts: Utc::now().timestamp(),
            text: trimmed.to_string(),
        });
        self.tab.set_json(&keys::notes(&self.usuario), &notes);
        notes
    }
}
