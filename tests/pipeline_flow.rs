//! End-to-end upload/analyze/display cycle against the production stack:
//! decode, quality verdict, canonical payload, outbound request, parsed
//! response, confidence assessment.

use std::io::Cursor;

use base64::Engine as _;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use reportlens::pipeline::wire::{AnalysisRequest, AnalysisResponse, REPORT_ANALYSIS_PROMPT};
use reportlens::{AnalysisError, DocumentAnalyzer};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// A report-like page: light background with dark text stripes.
fn report_page(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |_, y| {
        if (y / 12) % 3 == 0 {
            Rgba([40, 40, 40, 255])
        } else {
            Rgba([245, 245, 245, 255])
        }
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .unwrap();
    cursor.into_inner()
}

#[tokio::test]
async fn full_cycle_produces_payload_verdict_and_confidence() {
    init_tracing();
    let analyzer = DocumentAnalyzer::standard();

    // Upload: a clean 1000x1000 page.
    let prepared = analyzer.prepare(report_page(1000, 1000)).await.unwrap();
    assert!(prepared.verdict.passed, "verdict: {:?}", prepared.verdict);
    assert_eq!(prepared.verdict.summary(), "Image quality checks passed");

    // The payload is a decodable grayscale PNG.
    let png = base64::engine::general_purpose::STANDARD
        .decode(&prepared.image.payload)
        .unwrap();
    let gray = image::load_from_memory(&png).unwrap().to_rgba8();
    for pixel in gray.pixels() {
        assert_eq!(pixel.0[0], pixel.0[1]);
        assert_eq!(pixel.0[1], pixel.0[2]);
    }

    // The collaborator embeds the payload into the outbound body.
    let request = AnalysisRequest::for_document(&prepared.image, REPORT_ANALYSIS_PROMPT);
    let body = serde_json::to_string(&request).unwrap();
    let as_value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(as_value["messages"][0]["content"][1]["mediaType"], "image/png");
    assert_eq!(
        as_value["messages"][0]["content"][1]["payload"],
        prepared.image.payload
    );

    // The endpoint answers; its first choice is scored for hedging.
    let canned = serde_json::json!({
        "choices": [{ "message": { "content":
            "The hemoglobin value appears to be 13.2 g/dL but the reference range is unclear."
        } }]
    })
    .to_string();
    let response = AnalysisResponse::parse(&canned).unwrap();
    let assessment = analyzer.assess_response(response.content().unwrap());

    assert!((assessment.score - 0.90).abs() < 1e-6);
    assert_eq!(assessment.matched_phrases.len(), 2);
    assert_eq!(assessment.matched_phrases[0].phrase, "unclear");
    assert_eq!(assessment.matched_phrases[1].phrase, "appears to be");
    assert!(!assessment.needs_review());
}

#[tokio::test]
async fn degraded_upload_warns_but_still_submits() {
    init_tracing();
    let analyzer = DocumentAnalyzer::standard();

    // Small and dark: two advisory issues, yet the payload is produced.
    let dark = RgbaImage::from_pixel(400, 400, Rgba([10, 10, 10, 255]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(dark)
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .unwrap();

    let prepared = analyzer.prepare(cursor.into_inner()).await.unwrap();
    assert!(!prepared.verdict.passed);
    let summary = prepared.verdict.summary();
    assert!(summary.starts_with("Image quality issues: Low resolution image."));
    assert!(summary.contains("Image appears dark."));
    assert!(!prepared.image.payload.is_empty());

    // A heavily hedged answer crosses the review threshold.
    let assessment = analyzer.assess_response(
        "It might be an infiltrate, could be overlying soft tissue, possibly \
         positioning; the costophrenic angle is not visible, the annotation is \
         illegible, and the date stamp is hard to read. Findings are uncertain.",
    );
    assert!(assessment.needs_review());
    assert!(assessment.score <= 0.70);
}

#[tokio::test]
async fn rejected_upload_never_reaches_the_wire() {
    init_tracing();
    let analyzer = DocumentAnalyzer::standard();

    let err = analyzer.prepare(vec![0u8; 16]).await.unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput(_)));
    assert_eq!(err.user_message(), "Please upload a JPEG or PNG under 5 MB.");
}
