//! Light/dark theme preference.
//!
//! # Invariants
//! - Every mode change is written back to the key-value store.

use crate::storage::KeyValueStore;
use log::{info, warn};

/// Key holding the persisted theme mode.
pub const THEME_STORAGE_KEY: &str = "theme-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

pub struct ThemeService<S: KeyValueStore> {
    store: S,
    mode: ThemeMode,
}

impl<S: KeyValueStore> ThemeService<S> {
    /// Picks the stored mode, else the host's system preference.
    pub fn new(store: S, system_prefers_dark: bool) -> Self {
        let stored = store
            .get(THEME_STORAGE_KEY)
            .ok()
            .flatten()
            .and_then(|value| ThemeMode::parse(&value));
        let mode = stored.unwrap_or(if system_prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        });

        let service = Self { store, mode };
        service.persist();
        service
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark_mode(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    pub fn is_light_mode(&self) -> bool {
        self.mode == ThemeMode::Light
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.set_theme(self.mode.toggled());
        self.mode
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.persist();
    }

    fn persist(&self) {
        match self.store.set(THEME_STORAGE_KEY, self.mode.as_str()) {
            Ok(()) => info!("event=theme_apply module=theme status=ok mode={}", self.mode.as_str()),
            Err(err) => warn!(
                "event=theme_apply module=theme status=unsaved mode={} error={err}",
                self.mode.as_str()
            ),
        }
    }
}
