//! Document-image quality gating and response-confidence assessment for
//! medical report analysis.
//!
//! Before a report image goes to a vision-capable inference endpoint, the
//! pipeline decodes it, measures resolution, brightness and contrast, and
//! re-encodes it as a deterministic grayscale PNG payload. After the
//! endpoint answers, a hedge-phrase scan over the free-text response gives
//! a bounded confidence estimate with the matched phrases as evidence.
//!
//! The crate owns no I/O. The upload control that bounds file selection
//! and the HTTP client that carries the encoded payload are collaborators;
//! they consume [`PreparedDocument`] and the [`pipeline::wire`] contract
//! types and hand back the endpoint's text.
//!
//! ```no_run
//! # async fn demo(image_bytes: Vec<u8>, response_text: &str) {
//! use reportlens::DocumentAnalyzer;
//!
//! let analyzer = DocumentAnalyzer::standard();
//! let prepared = analyzer.prepare(image_bytes).await.unwrap();
//! println!("{}", prepared.verdict.summary());
//!
//! let assessment = analyzer.assess_response(response_text);
//! println!("confidence: {}%", assessment.percent());
//! # }
//! ```

pub mod pipeline;

pub use pipeline::{
    decode_image, luminance, luminance_stats, AnalysisError, CanonicalEncoder,
    ConfidenceAssessment, ConfidenceScorer, DecodeLimits, DocumentAnalyzer,
    DocumentQualityAssessor, EncodedImage, GrayscalePngEncoder, HedgeConfidenceScorer,
    HedgeLexicon, LuminanceStats, PhraseMatch, PreparedDocument, QualityAssessor, QualityIssue,
    QualityThresholds, QualityVerdict, RasterBuffer,
};
