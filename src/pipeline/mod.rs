pub mod types;
pub mod raster;
pub mod quality;
pub mod encode;
pub mod confidence;
pub mod wire;
pub mod orchestrator;

pub use types::*;
pub use raster::*;
pub use quality::*;
pub use encode::*;
pub use confidence::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid image input: {0}")]
    InvalidInput(String),

    #[error("Image decoding failed: {0}")]
    Decode(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("Analysis task failed: {0}")]
    TaskJoin(String),
}

impl AnalysisError {
    /// Actionable copy shown next to the upload control. Decode and input
    /// errors block submission; the user retries with another file.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "Please upload a JPEG or PNG under 5 MB.",
            Self::Decode(_) => "Could not read this image. Please try another file.",
            Self::Encode(_) | Self::TaskJoin(_) => {
                "Something went wrong while preparing this image. Please try again."
            }
        }
    }
}
