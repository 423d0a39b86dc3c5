//! Composes the pipeline services around one upload/analyze cycle.

use std::sync::Arc;

use tracing::{info, info_span};

use super::confidence::HedgeConfidenceScorer;
use super::encode::GrayscalePngEncoder;
use super::quality::DocumentQualityAssessor;
use super::raster::{decode_image, DecodeLimits};
use super::types::{
    CanonicalEncoder, ConfidenceAssessment, ConfidenceScorer, PreparedDocument, QualityAssessor,
};
use super::AnalysisError;

/// Stateless front door for one upload/analyze/display cycle.
///
/// Services sit behind trait objects so tests and future endpoints can
/// swap any stage. Reentrant: concurrent `prepare` calls each work on
/// their own buffers, and a superseded upload's result is simply dropped
/// by the caller. Nothing is cached across calls.
#[derive(Clone)]
pub struct DocumentAnalyzer {
    quality: Arc<dyn QualityAssessor>,
    encoder: Arc<dyn CanonicalEncoder>,
    scorer: Arc<dyn ConfidenceScorer>,
    limits: DecodeLimits,
}

impl DocumentAnalyzer {
    pub fn new(
        quality: Arc<dyn QualityAssessor>,
        encoder: Arc<dyn CanonicalEncoder>,
        scorer: Arc<dyn ConfidenceScorer>,
        limits: DecodeLimits,
    ) -> Self {
        Self {
            quality,
            encoder,
            scorer,
            limits,
        }
    }

    /// Production stack: document thresholds, grayscale PNG, hedge
    /// scoring, 5 MB upload bound.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(DocumentQualityAssessor::new()),
            Arc::new(GrayscalePngEncoder),
            Arc::new(HedgeConfidenceScorer::new()),
            DecodeLimits::default(),
        )
    }

    /// Decode, assess and encode one upload without leaving the thread.
    ///
    /// The verdict is advisory: a failing check still yields the encoded
    /// payload, and the caller decides what to surface.
    pub fn prepare_sync(&self, image_bytes: &[u8]) -> Result<PreparedDocument, AnalysisError> {
        let _span = info_span!("prepare_document", input_bytes = image_bytes.len()).entered();

        let raster = decode_image(image_bytes, &self.limits)?;
        let verdict = self.quality.assess(&raster);
        let image = self.encoder.encode(&raster)?;

        info!(
            dimensions = format!("{}x{}", raster.width(), raster.height()),
            payload_chars = image.payload.len(),
            passed = verdict.passed,
            issues = verdict.issues.len(),
            "Prepared document for submission"
        );

        Ok(PreparedDocument {
            original_width: raster.width(),
            original_height: raster.height(),
            verdict,
            image,
        })
    }

    /// Async variant for callers on a runtime. Decoding and encoding are
    /// CPU-bound, so the whole preparation runs on the blocking pool.
    pub async fn prepare(&self, image_bytes: Vec<u8>) -> Result<PreparedDocument, AnalysisError> {
        let analyzer = self.clone();
        tokio::task::spawn_blocking(move || analyzer.prepare_sync(&image_bytes))
            .await
            .map_err(|e| AnalysisError::TaskJoin(e.to_string()))?
    }

    /// Score the endpoint's free-text answer for hedging.
    pub fn assess_response(&self, response_text: &str) -> ConfidenceAssessment {
        self.scorer.score(response_text)
    }
}
