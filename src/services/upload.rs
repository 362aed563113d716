//! One-shot decoding of an uploaded image.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::fs;
use std::path::PathBuf;

use super::qr_decoder::{decode_raster, QrDecoder};
use crate::types::errors::ScanError;
use crate::types::qr::InversionPolicy;

/// Where an uploaded image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    Path(PathBuf),
    DataUrl(String),
}

/// Reads the upload to raw file bytes.
pub fn read_upload(source: &UploadSource) -> Result<Vec<u8>, ScanError> {
    match source {
        UploadSource::Path(path) => fs::read(path)
            .map_err(|e| ScanError::Upload(format!("{}: {}", path.display(), e))),
        UploadSource::DataUrl(url) => decode_data_url(url),
    }
}

/// Extracts the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ScanError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ScanError::Upload("not a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ScanError::Upload("data URL has no payload".to_string()))?;
    if !header.split(';').any(|part| part == "base64") {
        return Err(ScanError::Upload("only base64 data URLs are supported".to_string()));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| ScanError::Upload(format!("base64 decode error: {}", e)))
}

/// Loads the bytes as an image and runs a single decode attempt.
///
/// `Ok(None)` means the image was readable but held no code.
pub fn decode_upload_bytes<D: QrDecoder + ?Sized>(
    decoder: &D,
    bytes: &[u8],
    inversion: InversionPolicy,
) -> Result<Option<String>, ScanError> {
    let raster = image::load_from_memory(bytes)
        .map_err(|e| ScanError::Upload(format!("not an image: {}", e)))?
        .to_rgba8();
    log::debug!("decoding upload {}x{}", raster.width(), raster.height());
    Ok(decode_raster(decoder, &raster, inversion))
}
