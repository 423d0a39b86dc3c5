//! Canonical encoding: grayscale PNG, base64 payload.
//!
//! Normalizes heterogeneous uploads into one deterministic transmission
//! format and drops color noise before the payload reaches the vision
//! endpoint. Two buffers with identical pixels always produce identical
//! payloads.

use std::io::Cursor;

use base64::Engine as _;
use image::{DynamicImage, ImageOutputFormat};

use super::raster::{luminance, RasterBuffer};
use super::types::{CanonicalEncoder, EncodedImage};
use super::AnalysisError;

/// Media type every canonical payload declares, whatever the input was.
pub const CANONICAL_MEDIA_TYPE: &str = "image/png";

/// Production encoder: per-pixel luminance written back into all three
/// color channels, alpha untouched, then PNG serialization and base64.
pub struct GrayscalePngEncoder;

impl CanonicalEncoder for GrayscalePngEncoder {
    fn encode(&self, raster: &RasterBuffer) -> Result<EncodedImage, AnalysisError> {
        let mut gray = raster.as_rgba().clone();
        for pixel in gray.pixels_mut() {
            let luma = luminance(pixel.0[0], pixel.0[1], pixel.0[2])
                .round()
                .clamp(0.0, 255.0) as u8;
            pixel.0[0] = luma;
            pixel.0[1] = luma;
            pixel.0[2] = luma;
        }

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(gray)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .map_err(|e| AnalysisError::Encode(format!("PNG encoding failed: {e}")))?;

        let payload = base64::engine::general_purpose::STANDARD.encode(cursor.into_inner());
        Ok(EncodedImage::new(CANONICAL_MEDIA_TYPE, payload))
    }
}
