// QRDesk platform paths for Linux
// Config: ~/.config/qrdesk
// Data:   ~/.local/share/qrdesk

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/qrdesk` if set, otherwise `~/.config/qrdesk`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("qrdesk"),
        _ => home_dir().join(".config").join("qrdesk"),
    }
}

/// Uses `$XDG_DATA_HOME/qrdesk` if set, otherwise `~/.local/share/qrdesk`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("qrdesk"),
        _ => home_dir().join(".local").join("share").join("qrdesk"),
    }
}
