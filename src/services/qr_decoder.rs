//! QR decoding behind the `QrDecoder` trait.
//!
//! `RqrrDecoder` converts RGBA pixels to luma and hands them to `rqrr`,
//! once per polarity named by the request's [`InversionPolicy`].

use image::RgbaImage;

use crate::types::qr::{DecodeRequest, InversionPolicy};

/// Decode contract: pixels in, text or nothing out.
pub trait QrDecoder {
    fn decode(&self, request: &DecodeRequest<'_>) -> Option<String>;
}

impl<D: QrDecoder + ?Sized> QrDecoder for &D {
    fn decode(&self, request: &DecodeRequest<'_>) -> Option<String> {
        (**self).decode(request)
    }
}

/// Decoder backed by the `rqrr` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }

    /// ITU-R 601 luma of every RGBA pixel, optionally inverted.
    fn luma(pixels: &[u8], invert: bool) -> Vec<u8> {
        pixels
            .chunks_exact(4)
            .map(|px| {
                let y = (px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114) / 1000;
                let y = y as u8;
                if invert {
                    255 - y
                } else {
                    y
                }
            })
            .collect()
    }

    fn decode_luma(luma: &[u8], width: usize, height: usize) -> Option<String> {
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| luma[y * width + x]);
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => return Some(content),
                Err(e) => log::debug!("grid found but not decodable: {:?}", e),
            }
        }
        None
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, request: &DecodeRequest<'_>) -> Option<String> {
        let width = request.width as usize;
        let height = request.height as usize;
        if width == 0 || height == 0 || request.pixels.len() < width * height * 4 {
            log::warn!(
                "decode request has {} bytes for {}x{}",
                request.pixels.len(),
                width,
                height
            );
            return None;
        }
        let pixels = &request.pixels[..width * height * 4];
        for &invert in request.inversion.passes() {
            let luma = Self::luma(pixels, invert);
            if let Some(text) = Self::decode_luma(&luma, width, height) {
                return Some(text);
            }
        }
        None
    }
}

/// Submits a whole raster to a decoder.
pub fn decode_raster<D: QrDecoder + ?Sized>(
    decoder: &D,
    raster: &RgbaImage,
    inversion: InversionPolicy,
) -> Option<String> {
    decoder.decode(&DecodeRequest {
        pixels: raster.as_raw(),
        width: raster.width(),
        height: raster.height(),
        inversion,
    })
}
