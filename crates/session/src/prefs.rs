//! Cross-tab user preferences.

use storage::{keys, Store};

/// UI theme, persisted in the shared scope so every tab agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Oscuro,
    Claro,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Oscuro => "oscuro",
            Theme::Claro => "claro",
        }
    }

    /// Load the stored theme; anything unrecognized falls back to dark.
    pub fn load(shared: &Store) -> Self {
        match shared.get(keys::TEMA).as_deref() {
            Some("claro") => Theme::Claro,
            _ => Theme::Oscuro,
        }
    }

    pub fn save(self, shared: &Store) {
        shared.set(keys::TEMA, self.as_str());
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Oscuro => Theme::Claro,
            Theme::Claro => Theme::Oscuro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_value_falls_back_to_dark() {
        let shared = Store::memory();
        shared.set(keys::TEMA, "fuchsia");
        assert_eq!(Theme::load(&shared), Theme::Oscuro);
    }

    #[test]
    fn roundtrip_and_toggle() {
        let shared = Store::memory();
        Theme::Claro.save(&shared);
        assert_eq!(Theme::load(&shared), Theme::Claro);
        assert_eq!(Theme::load(&shared).toggled(), Theme::Oscuro);
    }
}
