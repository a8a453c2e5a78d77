use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::enums::{Manufacturer, NominalSize, ReadingStage};

/// Fields mined from one OCR attempt on a meter face.
///
/// Immutable snapshot: a retake produces a new record rather than editing this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub candidate_reading: Option<String>,
    pub reading_stage: ReadingStage,
    pub manufacturer: Option<Manufacturer>,
    pub nominal_size: Option<NominalSize>,
    pub serial_number: Option<String>,
    pub raw_text: String,
}

impl ExtractedFields {
    /// Record with nothing extracted, used when recognition produced no text.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            candidate_reading: None,
            reading_stage: ReadingStage::None,
            manufacturer: None,
            nominal_size: None,
            serial_number: None,
            raw_text: raw_text.into(),
        }
    }

    /// The operator has to type the register reading in.
    pub fn needs_manual_entry(&self) -> bool {
        self.reading_stage == ReadingStage::None
    }
}

/// OCR engine abstraction (allows mocking for tests).
///
/// `Ok(None)` is the "no text" outcome, not a failure.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Option<String>, ExtractionError>;
}
