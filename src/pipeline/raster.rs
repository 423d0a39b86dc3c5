//! Image decoding and raster statistics.
//!
//! The decoder turns an uploaded JPEG or PNG into a [`RasterBuffer`], the
//! flat RGBA pixel grid the assessor and encoder both read. Byte bounds
//! are enforced before any decode work happens, and the luminance weights
//! shared by the quality statistics and the grayscale transform live here.

use image::{GenericImageView, ImageFormat, RgbaImage};
use tracing::debug;

use super::AnalysisError;

/// Perceptual luma weights. Downstream thresholds are tuned against these
/// exact constants; keep them in sync with nothing, they are the source.
pub const LUMA_RED: f32 = 0.30;
pub const LUMA_GREEN: f32 = 0.59;
pub const LUMA_BLUE: f32 = 0.11;

/// Byte bounds applied before decoding.
#[derive(Debug, Clone)]
pub struct DecodeLimits {
    /// Inputs above this are rejected without decoding.
    pub max_bytes: usize,
    /// Smallest plausible image file (a minimal PNG is ~67 bytes).
    pub min_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            min_bytes: 67,
        }
    }
}

/// Decoded pixels for one uploaded image: width, height and a flat RGBA
/// sequence of exactly `width * height * 4` channel values.
///
/// Created once per upload, read by the assessor and the encoder, then
/// dropped. Never cached across uploads.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    pixels: RgbaImage,
}

impl RasterBuffer {
    /// Wrap already-decoded RGBA pixels.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Per-pixel luminance in raster order.
    pub fn luminances(&self) -> impl Iterator<Item = f32> + '_ {
        self.pixels
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
    }
}

/// Weighted luminance of one pixel on the 0-255 scale.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMA_RED * r as f32 + LUMA_GREEN * g as f32 + LUMA_BLUE * b as f32
}

/// Mean and population standard deviation of per-pixel luminance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminanceStats {
    pub mean: f32,
    pub std_dev: f32,
}

/// One-pass luminance statistics over a buffer.
/// Returns `None` when there are no pixels to measure.
pub fn luminance_stats(raster: &RasterBuffer) -> Option<LuminanceStats> {
    let count = raster.pixel_count();
    if count == 0 {
        return None;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for luma in raster.luminances() {
        let v = luma as f64;
        sum += v;
        sum_sq += v * v;
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64) - (mean * mean);
    Some(LuminanceStats {
        mean: mean as f32,
        std_dev: variance.max(0.0).sqrt() as f32,
    })
}

/// Reject inputs outside the byte bounds before any decode work.
pub fn validate_image_bytes(bytes: &[u8], limits: &DecodeLimits) -> Result<(), AnalysisError> {
    if bytes.len() < limits.min_bytes {
        return Err(AnalysisError::InvalidInput(
            "Image data too small to be valid".into(),
        ));
    }
    if bytes.len() > limits.max_bytes {
        return Err(AnalysisError::InvalidInput(format!(
            "Image data exceeds {}MB limit",
            limits.max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Decode an uploaded JPEG or PNG into a [`RasterBuffer`].
///
/// The container is sniffed from the bytes themselves: another recognized
/// format is invalid input, unrecognizable or corrupt bytes are a terminal
/// decode error and no buffer is produced. Input bytes are never mutated.
pub fn decode_image(bytes: &[u8], limits: &DecodeLimits) -> Result<RasterBuffer, AnalysisError> {
    validate_image_bytes(bytes, limits)?;

    let format = image::guess_format(bytes)
        .map_err(|e| AnalysisError::Decode(format!("Unrecognized image container: {e}")))?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg => {}
        other => {
            return Err(AnalysisError::InvalidInput(format!(
                "Unsupported media type {other:?}; JPEG and PNG are accepted"
            )));
        }
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AnalysisError::Decode(format!("Failed to decode image: {e}")))?;
    let (width, height) = decoded.dimensions();

    debug!(
        input_bytes = bytes.len(),
        format = ?format,
        dimensions = format!("{width}x{height}"),
        "Decoded upload into raster buffer"
    );

    Ok(RasterBuffer::from_rgba(decoded.to_rgba8()))
}
