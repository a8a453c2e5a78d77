//! Manufacturer and nominal-size matching against normalized OCR text.
//!
//! Matching walks an explicit, ordered vocabulary and returns the first entry
//! whose normalized term is a substring of the normalized text. The order of
//! the vocabulary slice is the only tie-break.

use super::normalize::normalize;
use crate::models::enums::{Manufacturer, NominalSize};

/// A vocabulary entry with the term printed on meter faces.
pub trait VocabularyTerm: Copy {
    fn term(&self) -> &'static str;
}

impl VocabularyTerm for Manufacturer {
    fn term(&self) -> &'static str {
        self.label()
    }
}

impl VocabularyTerm for NominalSize {
    fn term(&self) -> &'static str {
        self.label()
    }
}

/// Manufacturer search order.
pub const MANUFACTURER_VOCABULARY: &[Manufacturer] = &[
    Manufacturer::Badger,
    Manufacturer::Neptune,
    Manufacturer::Sensus,
    Manufacturer::Elster,
    Manufacturer::Itron,
    Manufacturer::Kamstrup,
    Manufacturer::MasterMeter,
    Manufacturer::Mueller,
    Manufacturer::Zenner,
    Manufacturer::Diehl,
];

/// Nominal-size search order.
///
/// Compound and fractional sizes come before the sizes they contain:
/// `5/8" x 3/4"` contains `3/4"`, and `1-1/2"` ends with `2"`.
pub const NOMINAL_SIZE_VOCABULARY: &[NominalSize] = &[
    NominalSize::FiveEighthsByThreeQuarters,
    NominalSize::FiveEighths,
    NominalSize::ThreeQuarters,
    NominalSize::OneAndHalf,
    NominalSize::One,
    NominalSize::Two,
    NominalSize::Three,
    NominalSize::Four,
    NominalSize::Six,
    NominalSize::Eight,
];

/// First vocabulary entry (in slice order) whose term occurs in `normalized_text`.
pub fn match_first<T: VocabularyTerm>(normalized_text: &str, vocabulary: &[T]) -> Option<T> {
    vocabulary.iter().copied().find(|entry| {
        let key = normalize(entry.term());
        !key.is_empty() && normalized_text.contains(&key)
    })
}

pub fn match_manufacturer(
    normalized_text: &str,
    known_manufacturers: &[Manufacturer],
) -> Option<Manufacturer> {
    match_first(normalized_text, known_manufacturers)
}

pub fn match_nominal_size(normalized_text: &str, known_sizes: &[NominalSize]) -> Option<NominalSize> {
    match_first(normalized_text, known_sizes)
}
