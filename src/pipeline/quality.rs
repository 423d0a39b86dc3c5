//! Raster quality checks that run before submission.
//!
//! Every check runs and every failing check appends its message. The
//! verdict is advisory: it is surfaced next to the upload control but
//! never blocks encoding or submission.

use tracing::debug;

use super::raster::{luminance_stats, RasterBuffer};
use super::types::{QualityAssessor, QualityIssue, QualityVerdict};

/// Minimums an uploaded report image should clear.
#[derive(Debug, Clone)]
pub struct QualityThresholds {
    /// Below either dimension the model starts missing fine print.
    pub min_width: u32,
    pub min_height: u32,
    /// Mean luminance floor on the 0-255 scale.
    pub min_mean_luminance: f32,
    /// Luminance standard-deviation floor, a proxy for text legibility.
    pub min_contrast: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 800,
            min_mean_luminance: 100.0,
            min_contrast: 40.0,
        }
    }
}

/// Production assessor: resolution, brightness and contrast, in that
/// order, accumulating every failure rather than stopping at the first.
pub struct DocumentQualityAssessor {
    thresholds: QualityThresholds,
}

impl DocumentQualityAssessor {
    pub fn new() -> Self {
        Self {
            thresholds: QualityThresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for DocumentQualityAssessor {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityAssessor for DocumentQualityAssessor {
    fn assess(&self, raster: &RasterBuffer) -> QualityVerdict {
        let width = raster.width();
        let height = raster.height();

        let Some(stats) = luminance_stats(raster) else {
            return QualityVerdict {
                passed: false,
                issues: vec![QualityIssue::Unanalyzable],
                width,
                height,
                mean_luminance: 0.0,
                contrast: 0.0,
            };
        };

        let mut issues = Vec::new();

        if width < self.thresholds.min_width || height < self.thresholds.min_height {
            issues.push(QualityIssue::LowResolution);
        }
        if stats.mean < self.thresholds.min_mean_luminance {
            issues.push(QualityIssue::LowBrightness);
        }
        if stats.std_dev < self.thresholds.min_contrast {
            issues.push(QualityIssue::LowContrast);
        }

        let verdict = QualityVerdict {
            passed: issues.is_empty(),
            issues,
            width,
            height,
            mean_luminance: stats.mean,
            contrast: stats.std_dev,
        };

        debug!(
            dimensions = format!("{width}x{height}"),
            mean_luminance = verdict.mean_luminance,
            contrast = verdict.contrast,
            issues = verdict.issues.len(),
            "Assessed image quality"
        );

        verdict
    }
}

/// Mock assessor for orchestrator tests: always passes.
pub struct MockQualityAssessor;

impl QualityAssessor for MockQualityAssessor {
    fn assess(&self, raster: &RasterBuffer) -> QualityVerdict {
        QualityVerdict {
            passed: true,
            issues: vec![],
            width: raster.width(),
            height: raster.height(),
            mean_luminance: 0.0,
            contrast: 0.0,
        }
    }
}
