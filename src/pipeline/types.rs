use std::fmt;

use serde::{Deserialize, Serialize};

use super::confidence::thresholds;
use super::raster::RasterBuffer;
use super::AnalysisError;

/// A single failed quality check, in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityIssue {
    LowResolution,
    LowBrightness,
    LowContrast,
    /// The buffer held no pixels to measure.
    Unanalyzable,
}

impl QualityIssue {
    /// Guidance shown to the user for this check.
    pub fn message(&self) -> &'static str {
        match self {
            Self::LowResolution => "Low resolution image. Higher resolution improves accuracy.",
            Self::LowBrightness => "Image appears dark. Use well-lit images for better results.",
            Self::LowContrast => {
                "Low contrast detected. Use images with clear text-background contrast."
            }
            Self::Unanalyzable => "Could not analyze image quality.",
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Advisory verdict over a decoded image.
///
/// Callers render the issues next to the upload control; submission
/// proceeds either way. The measured scores ride along so thresholds can
/// be revisited without re-reading pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub passed: bool,
    pub issues: Vec<QualityIssue>,
    pub width: u32,
    pub height: u32,
    /// Mean per-pixel luminance on the 0-255 scale.
    pub mean_luminance: f32,
    /// Population standard deviation of per-pixel luminance.
    pub contrast: f32,
}

impl QualityVerdict {
    /// One-line summary for inline display.
    pub fn summary(&self) -> String {
        if self.passed {
            "Image quality checks passed".to_string()
        } else {
            let joined = self
                .issues
                .iter()
                .map(|issue| issue.message())
                .collect::<Vec<_>>()
                .join(" ");
            format!("Image quality issues: {joined}")
        }
    }
}

/// Canonical transmittable form of an uploaded image: a grayscale PNG as
/// pure base64 plus its declared media type. Embedded verbatim in the
/// outbound request body, hence the camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub media_type: String,
    pub payload: String,
}

impl EncodedImage {
    /// Build from a media type and a base64 payload. Any `data:` URI
    /// prefix is stripped so the payload is pure base64.
    pub fn new(media_type: impl Into<String>, payload: impl Into<String>) -> Self {
        let payload: String = payload.into();
        let payload = match payload.find(";base64,") {
            Some(idx) if payload.starts_with("data:") => {
                payload[idx + ";base64,".len()..].to_string()
            }
            _ => payload,
        };
        Self {
            media_type: media_type.into(),
            payload,
        }
    }
}

/// How confident the remote model's free-text answer reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    /// Bounded score in [0.0, 1.0]; each hedge occurrence costs 0.05.
    pub score: f32,
    /// Hedge phrases found, with occurrence counts, in lexicon order.
    pub matched_phrases: Vec<PhraseMatch>,
}

impl ConfidenceAssessment {
    /// True when the score falls below the review threshold and the UI
    /// should list the matched phrases.
    pub fn needs_review(&self) -> bool {
        self.score < thresholds::REVIEW
    }

    /// Score as a whole percentage for display.
    pub fn percent(&self) -> u8 {
        (self.score * 100.0).round() as u8
    }
}

/// A hedge phrase and how many times it occurred in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMatch {
    pub phrase: String,
    pub count: usize,
}

/// Everything the caller needs to submit one upload: the advisory verdict,
/// the canonical payload, and the source dimensions for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedDocument {
    pub verdict: QualityVerdict,
    pub image: EncodedImage,
    pub original_width: u32,
    pub original_height: u32,
}

/// Measures an image without modifying it. Pure read-only analysis.
pub trait QualityAssessor: Send + Sync {
    fn assess(&self, raster: &RasterBuffer) -> QualityVerdict;
}

/// Converts a raster into its canonical transmittable encoding.
pub trait CanonicalEncoder: Send + Sync {
    fn encode(&self, raster: &RasterBuffer) -> Result<EncodedImage, AnalysisError>;
}

/// Scores a free-text model response for hedging.
pub trait ConfidenceScorer: Send + Sync {
    fn score(&self, response_text: &str) -> ConfidenceAssessment;
}
