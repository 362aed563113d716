//! Saved generation defaults and the working settings context.
//!
//! `SettingsStore` owns the persisted truth: three independent keys written
//! together on save and read back once at startup. `SettingsContext` holds
//! the working values the generator reads; in-session changes go there and
//! are not persisted until an explicit save.

use crate::database::KeyValueStore;
use crate::types::errors::SettingsError;
use crate::types::scan::Notice;
use crate::types::settings::{QrSettings, SavedDefaults};

pub const SIZE_KEY: &str = "defaultSize";
pub const BACKGROUND_KEY: &str = "defaultBG";
pub const FOREGROUND_KEY: &str = "defaultFG";

/// Acknowledgment shown after a successful save.
pub const SAVED_MESSAGE: &str = "Settings saved!";

/// Trait defining the settings store interface.
pub trait SettingsStoreTrait {
    fn save(&mut self, size: u32, background: &str, foreground: &str)
        -> Result<Notice, SettingsError>;
    fn load_defaults(&self) -> SavedDefaults;
}

/// Persists size and colors as three keys in a key-value store.
pub struct SettingsStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("could not read {}: {}", key, e);
                None
            }
        }
    }
}

impl<S: KeyValueStore> SettingsStoreTrait for SettingsStore<S> {
    /// Overwrites all three keys. Color strings are stored as given.
    fn save(
        &mut self,
        size: u32,
        background: &str,
        foreground: &str,
    ) -> Result<Notice, SettingsError> {
        if size == 0 {
            return Err(SettingsError::InvalidValue(
                "size must be a positive integer".to_string(),
            ));
        }
        self.store.set(SIZE_KEY, &size.to_string())?;
        self.store.set(BACKGROUND_KEY, background)?;
        self.store.set(FOREGROUND_KEY, foreground)?;
        log::info!("saved defaults: size={} bg={} fg={}", size, background, foreground);
        Ok(Notice::Alert(SAVED_MESSAGE.to_string()))
    }

    /// Reads each key independently. Missing keys (or a size that is not a
    /// positive integer) come back as `None`.
    fn load_defaults(&self) -> SavedDefaults {
        let size = self.read(SIZE_KEY).and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                log::warn!("ignoring stored {} value {:?}", SIZE_KEY, raw);
                None
            }
        });
        SavedDefaults {
            size,
            background_color: self.read(BACKGROUND_KEY),
            foreground_color: self.read(FOREGROUND_KEY),
        }
    }
}

/// Working generation settings for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsContext {
    current: QrSettings,
}

impl SettingsContext {
    pub fn new(current: QrSettings) -> Self {
        Self { current }
    }

    pub fn current(&self) -> &QrSettings {
        &self.current
    }

    /// Back to factory defaults, then layered with whatever was saved.
    pub fn reset_with(&mut self, saved: &SavedDefaults) {
        self.current = QrSettings::default();
        saved.apply_to(&mut self.current);
    }

    pub fn set_size(&mut self, size: u32) -> Result<(), SettingsError> {
        if size == 0 {
            return Err(SettingsError::InvalidValue(
                "size must be a positive integer".to_string(),
            ));
        }
        self.current.size = size;
        Ok(())
    }

    pub fn set_background(&mut self, color: &str) {
        self.current.background_color = color.to_string();
    }

    pub fn set_foreground(&mut self, color: &str) {
        self.current.foreground_color = color.to_string();
    }
}
