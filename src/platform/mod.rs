// QRDesk platform abstraction
// Resolves where the config file and the storage database live on each OS.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Overrides the directory holding `qrdesk.db`.
pub const DATA_DIR_ENV: &str = "QRDESK_DATA_DIR";

/// File name of the storage database.
pub const DATABASE_FILE: &str = "qrdesk.db";

/// Returns the platform-specific configuration directory for QRDesk.
///
/// - **Linux**: `~/.config/qrdesk` (or `$XDG_CONFIG_HOME/qrdesk`)
/// - **macOS**: `~/Library/Application Support/QRDesk`
/// - **Windows**: `%APPDATA%/QRDesk`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory for QRDesk.
///
/// - **Linux**: `~/.local/share/qrdesk` (or `$XDG_DATA_HOME/qrdesk`)
/// - **macOS**: `~/Library/Application Support/QRDesk`
/// - **Windows**: `%APPDATA%/QRDesk`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Path of the storage database: `$QRDESK_DATA_DIR/qrdesk.db` when set,
/// otherwise inside [`get_data_dir`].
pub fn database_path() -> PathBuf {
    match env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(DATABASE_FILE),
        _ => get_data_dir().join(DATABASE_FILE),
    }
}
