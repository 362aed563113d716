use serde::{Deserialize, Serialize};

use super::qr::InversionPolicy;

/// Factory default pixel size for generated codes.
pub const DEFAULT_SIZE: u32 = 100;
/// Factory default background color.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
/// Factory default foreground (module) color.
pub const DEFAULT_FOREGROUND: &str = "#9b51e0";

/// Generation preferences: image size and the two colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QrSettings {
    pub size: u32,
    pub background_color: String,
    pub foreground_color: String,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            background_color: DEFAULT_BACKGROUND.to_string(),
            foreground_color: DEFAULT_FOREGROUND.to_string(),
        }
    }
}

/// Defaults read back from storage. `None` means the key was never saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedDefaults {
    pub size: Option<u32>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
}

impl SavedDefaults {
    /// Overwrites only the fields present in storage; the rest stand.
    pub fn apply_to(&self, settings: &mut QrSettings) {
        if let Some(size) = self.size {
            settings.size = size;
        }
        if let Some(bg) = &self.background_color {
            settings.background_color = bg.clone();
        }
        if let Some(fg) = &self.foreground_color {
            settings.foreground_color = fg.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.background_color.is_none() && self.foreground_color.is_none()
    }
}

/// Process-level configuration, stored as `config.json` in the config dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Storage scope for history and saved defaults.
    pub origin: String,
    /// Delay between scan attempts when the loop drives itself.
    pub frame_interval_ms: u64,
    /// Upper bound on frames examined by a self-driven scan.
    pub max_scan_frames: u32,
    pub scan_inversion: InversionPolicy,
    pub upload_inversion: InversionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: "qrdesk://local".to_string(),
            frame_interval_ms: 16,
            max_scan_frames: 600,
            scan_inversion: InversionPolicy::DontInvert,
            upload_inversion: InversionPolicy::DontInvert,
        }
    }
}
