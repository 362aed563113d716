use std::fmt;

// === StorageError ===

/// Errors raised by a key-value store backend.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Database operation failed.
    Database(String),
    /// A stored value could not be encoded or decoded.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Database(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === HistoryError ===

/// Errors related to the scan/generate history log.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// Reading or writing the persisted list failed.
    Storage(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Storage(msg) => write!(f, "History storage error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<StorageError> for HistoryError {
    fn from(e: StorageError) -> Self {
        HistoryError::Storage(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to saved defaults and the application config file.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Reading or writing the key-value store failed.
    Storage(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
    /// An I/O error occurred while reading or writing the config file.
    Io(String),
    /// Failed to serialize or deserialize the config file.
    Serialization(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Storage(msg) => write!(f, "Settings storage error: {}", msg),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
            SettingsError::Io(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::Serialization(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e.to_string())
    }
}

// === ScanError ===

/// Errors related to camera scanning and upload decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// The camera could not be opened (permission denied, no device).
    CameraUnavailable(String),
    /// A capture session is already running.
    AlreadyScanning,
    /// The camera loop is running, so the one-shot upload path is refused.
    Busy,
    /// The uploaded file could not be read or is not an image.
    Upload(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::CameraUnavailable(msg) => {
                write!(f, "Could not access camera: {}", msg)
            }
            ScanError::AlreadyScanning => write!(f, "A scan is already in progress"),
            ScanError::Busy => write!(f, "Camera scan in progress, stop it before uploading"),
            ScanError::Upload(msg) => write!(f, "Upload error: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}

// === CodecError ===

/// Errors related to QR image generation.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The text to encode is empty or whitespace only.
    EmptyInput,
    /// The requested pixel size cannot hold the symbol.
    InvalidSize(u32),
    /// A color string is not `#rgb` or `#rrggbb`.
    InvalidColor(String),
    /// The encoder rejected the payload (e.g. too long).
    Encode(String),
    /// Encoding the raster to an image format failed.
    Image(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::EmptyInput => write!(f, "Nothing to encode"),
            CodecError::InvalidSize(size) => write!(f, "Invalid image size: {}", size),
            CodecError::InvalidColor(color) => write!(f, "Invalid color: {}", color),
            CodecError::Encode(msg) => write!(f, "QR encode failed: {}", msg),
            CodecError::Image(msg) => write!(f, "Image error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<image::ImageError> for CodecError {
    fn from(e: image::ImageError) -> Self {
        CodecError::Image(e.to_string())
    }
}
