//! QR Generator for QRDesk.
//!
//! `QrEncoder` turns an [`EncodeRequest`] into an RGBA raster; the default
//! `QrcodeEncoder` uses the `qrcode` crate for the symbol and paints it
//! centred inside the requested box with a quiet zone. `QrGenerator` wraps
//! an encoder and produces the PNG, its data URL, and a download filename.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

use crate::types::errors::CodecError;
use crate::types::qr::{EncodeRequest, GeneratedCode};
use crate::types::settings::{QrSettings, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};

/// Quiet zone width in modules on each side.
pub const QUIET_ZONE: u32 = 4;

/// Encode contract: text and styling in, raster out.
pub trait QrEncoder {
    fn encode(&self, request: &EncodeRequest) -> Result<RgbaImage, CodecError>;
}

/// Parses any CSS color (`#rgb`, `#rrggbb`, `rgb()`, `hsl()`, names such
/// as `purple`) into a pixel.
pub fn parse_color(value: &str) -> Result<Rgba<u8>, CodecError> {
    csscolorparser::parse(value.trim())
        .map(|color| Rgba(color.to_rgba8()))
        .map_err(|_| CodecError::InvalidColor(value.to_string()))
}

/// Saved colors are stored unvalidated, so an unreadable one paints with
/// the factory color instead of failing the render.
fn color_or_default(value: &str, fallback: &str) -> Rgba<u8> {
    parse_color(value).unwrap_or_else(|e| {
        log::warn!("{}, using {}", e, fallback);
        parse_color(fallback).unwrap_or(Rgba([0, 0, 0, 255]))
    })
}

/// Encoder backed by the `qrcode` crate, at error-correction level H.
#[derive(Debug, Clone, Copy)]
pub struct QrcodeEncoder {
    pub ec_level: EcLevel,
    pub quiet_zone: u32,
}

impl Default for QrcodeEncoder {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            quiet_zone: QUIET_ZONE,
        }
    }
}

impl QrEncoder for QrcodeEncoder {
    fn encode(&self, request: &EncodeRequest) -> Result<RgbaImage, CodecError> {
        let dark = color_or_default(&request.foreground, DEFAULT_FOREGROUND);
        let light = color_or_default(&request.background, DEFAULT_BACKGROUND);
        let code = QrCode::with_error_correction_level(request.text.as_bytes(), self.ec_level)
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        let modules = code.width() as u32;
        let span = modules + 2 * self.quiet_zone;
        let scale = request.width.min(request.height) / span;
        if scale == 0 {
            return Err(CodecError::InvalidSize(request.width.min(request.height)));
        }

        let mut raster = RgbaImage::from_pixel(request.width, request.height, light);
        let offset_x = (request.width - modules * scale) / 2;
        let offset_y = (request.height - modules * scale) / 2;
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let mx = i as u32 % modules;
            let my = i as u32 / modules;
            for dy in 0..scale {
                for dx in 0..scale {
                    raster.put_pixel(offset_x + mx * scale + dx, offset_y + my * scale + dy, dark);
                }
            }
        }
        Ok(raster)
    }
}

/// Derives the download name: the URL host if `text` is an absolute URL,
/// otherwise `text` with every non-alphanumeric run removed.
pub fn download_file_name(text: &str) -> String {
    let stem = match url::Url::parse(text) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        Err(_) => text.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
    };
    format!("{}_QR.png", stem)
}

/// Builds downloadable codes from the current working settings.
pub struct QrGenerator<E: QrEncoder = QrcodeEncoder> {
    encoder: E,
}

impl Default for QrGenerator<QrcodeEncoder> {
    fn default() -> Self {
        Self::new(QrcodeEncoder::default())
    }
}

impl<E: QrEncoder> QrGenerator<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// Renders `text` at `settings.size` square. Blank input is refused.
    ///
    /// Every module needs at least one pixel after the 4-module quiet zone
    /// on each side, so long text needs a larger size: at the default 100px
    /// roughly 250 bytes is the most that fits. Past that the result is
    /// `CodecError::InvalidSize`.
    pub fn generate(&self, text: &str, settings: &QrSettings) -> Result<GeneratedCode, CodecError> {
        if text.trim().is_empty() {
            return Err(CodecError::EmptyInput);
        }
        if settings.size == 0 {
            return Err(CodecError::InvalidSize(0));
        }
        let request = EncodeRequest {
            text: text.to_string(),
            width: settings.size,
            height: settings.size,
            foreground: settings.foreground_color.clone(),
            background: settings.background_color.clone(),
        };
        let raster = self.encoder.encode(&request)?;

        let mut png = Vec::new();
        raster.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(&png));
        log::info!("generated {}x{} code ({} bytes)", request.width, request.height, png.len());

        Ok(GeneratedCode {
            text: request.text,
            width: request.width,
            height: request.height,
            png,
            data_url,
            file_name: download_file_name(text),
        })
    }
}
