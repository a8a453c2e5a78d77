pub mod types;
pub mod normalize;
pub mod reading;
pub mod entity;
pub mod serial;
pub mod orchestrator;

pub use types::*;
pub use normalize::*;
pub use reading::*;
pub use entity::*;
pub use serial::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}
