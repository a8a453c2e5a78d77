use super::entity::{
    match_manufacturer, match_nominal_size, MANUFACTURER_VOCABULARY, NOMINAL_SIZE_VOCABULARY,
};
use super::normalize::normalize;
use super::reading::extract_reading;
use super::serial::extract_serial;
use super::types::ExtractedFields;
use crate::models::enums::{Manufacturer, NominalSize};

/// Turns one OCR text blob into `ExtractedFields`.
///
/// Pure: the same input always yields the same record, and nothing is logged
/// above debug level or persisted. Notes, toasts and storage belong to the caller.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    manufacturers: Vec<Manufacturer>,
    sizes: Vec<NominalSize>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(MANUFACTURER_VOCABULARY, NOMINAL_SIZE_VOCABULARY)
    }
}

impl ExtractionPipeline {
    /// Pipeline with explicit vocabularies. Slice order is the match priority.
    pub fn new(manufacturers: &[Manufacturer], sizes: &[NominalSize]) -> Self {
        Self {
            manufacturers: manufacturers.to_vec(),
            sizes: sizes.to_vec(),
        }
    }

    pub fn run(&self, raw_text: &str) -> ExtractedFields {
        let normalized = normalize(raw_text);

        let manufacturer = match_manufacturer(&normalized, &self.manufacturers);
        let nominal_size = match_nominal_size(&normalized, &self.sizes);
        let reading = extract_reading(raw_text);
        let serial_number = extract_serial(raw_text);

        tracing::debug!(
            text_len = raw_text.len(),
            stage = reading.stage.as_str(),
            manufacturer = manufacturer.map(|m| m.as_str()),
            nominal_size = nominal_size.map(|s| s.as_str()),
            serial = serial_number.as_deref(),
            "Meter face extraction complete"
        );

        ExtractedFields {
            candidate_reading: reading.value,
            reading_stage: reading.stage,
            manufacturer,
            nominal_size,
            serial_number,
            raw_text: raw_text.to_string(),
        }
    }

    /// `None` is the recognizer's "no text" outcome: an all-empty record.
    pub fn run_optional(&self, raw_text: Option<&str>) -> ExtractedFields {
        match raw_text {
            Some(text) => self.run(text),
            None => ExtractedFields::empty(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::ReadingStage;

    #[test]
    fn full_meter_face() {
        let pipeline = ExtractionPipeline::default();
        let fields = pipeline.run("NEPTUNE T-10 5/8\" x 3/4\"\nReading: 123.45 gal\nSN 1A234567");

        assert_eq!(fields.candidate_reading.as_deref(), Some("123.45"));
        assert_eq!(fields.reading_stage, ReadingStage::Decimal);
        assert_eq!(fields.manufacturer, Some(Manufacturer::Neptune));
        assert_eq!(fields.nominal_size, Some(NominalSize::FiveEighthsByThreeQuarters));
        assert_eq!(fields.serial_number.as_deref(), Some("NEPTUNE"));
        assert!(fields.raw_text.starts_with("NEPTUNE"));
        assert!(!fields.needs_manual_entry());
    }

    #[test]
    fn no_text_gives_empty_record() {
        let fields = ExtractionPipeline::default().run_optional(None);
        assert_eq!(fields, ExtractedFields::empty(""));
        assert!(fields.needs_manual_entry());
    }

    #[test]
    fn no_reading_still_fills_other_fields() {
        let fields = ExtractionPipeline::default().run("Badger Meter 1\" #12345#");
        assert_eq!(fields.reading_stage, ReadingStage::None);
        assert!(fields.candidate_reading.is_none());
        assert_eq!(fields.manufacturer, Some(Manufacturer::Badger));
        assert_eq!(fields.nominal_size, Some(NominalSize::One));
        assert_eq!(fields.serial_number.as_deref(), Some("Badger"));
        assert!(fields.needs_manual_entry());
    }

    #[test]
    fn identical_input_identical_output() {
        let pipeline = ExtractionPipeline::default();
        let text = "Sensus iPERL 3/4\" 0456 78 CF S/N 71234AB";
        let a = pipeline.run(text);
        let b = pipeline.run(text);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn custom_vocabulary_order_respected() {
        let pipeline = ExtractionPipeline::new(
            &[Manufacturer::Sensus, Manufacturer::Neptune],
            &[NominalSize::Two, NominalSize::OneAndHalf],
        );
        let fields = pipeline.run("Neptune / Sensus 1-1/2\"");
        assert_eq!(fields.manufacturer, Some(Manufacturer::Sensus));
        assert_eq!(fields.nominal_size, Some(NominalSize::Two));
    }

    #[test]
    fn serial_is_case_preserving_while_matching_is_not() {
        let fields = ExtractionPipeline::default().run("KAMSTRUP mc21 xY9kQ2");
        assert_eq!(fields.manufacturer, Some(Manufacturer::Kamstrup));
        assert_eq!(fields.serial_number.as_deref(), Some("KAMSTRUP"));
        assert_eq!(fields.raw_text, "KAMSTRUP mc21 xY9kQ2");
    }
}
