//! Register-reading candidates from meter-face OCR text.
//!
//! Four strategies run in a fixed order and the first one that accepts a match
//! wins; later strategies are never consulted. Inside a strategy the first
//! acceptable match in scan order wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::ReadingStage;

/// Characters that disqualify a numeric match when directly adjacent to it.
/// OCR noise around printed symbols (`#`, `*`, brackets) is not a register.
const EXCLUDED_NEIGHBOURS: &[char] = &[
    '#', '@', '$', '%', '^', '&', '*', '+', '=', '<', '>', '{', '}', '[', ']', '|', '\\', ':',
    ';',
];

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9]+\.[0-9]+\b").unwrap());

static GALLONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.[0-9]+)?)\s*(?:gallons|gallon|gal)").unwrap()
});

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9]{5,8}\b").unwrap());

static SPLIT_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+) +([0-9]{1,3})\b").unwrap());

/// Longest fractional part a split reading may carry. The pattern already
/// caps the second group; the check in `split_decimal` guards pattern edits.
const MAX_SPLIT_FRACTION_DIGITS: usize = 3;

/// A register-reading candidate and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingCandidate {
    pub value: Option<String>,
    pub stage: ReadingStage,
}

impl ReadingCandidate {
    fn found(value: String, stage: ReadingStage) -> Self {
        Self {
            value: Some(value),
            stage,
        }
    }

    fn none() -> Self {
        Self {
            value: None,
            stage: ReadingStage::None,
        }
    }
}

/// Run the cascade over raw OCR text.
///
/// No match is a normal outcome (`stage == ReadingStage::None`), never an error.
pub fn extract_reading(raw_text: &str) -> ReadingCandidate {
    let stages: [(ReadingStage, fn(&str) -> Option<String>); 4] = [
        (ReadingStage::Decimal, decimal),
        (ReadingStage::GallonsAdjacent, gallons_adjacent),
        (ReadingStage::DigitRun, digit_run),
        (ReadingStage::SplitDecimalReconstruction, split_decimal),
    ];

    for (stage, strategy) in stages {
        if let Some(value) = strategy(raw_text) {
            tracing::debug!(stage = stage.as_str(), "Reading candidate accepted");
            return ReadingCandidate::found(value, stage);
        }
    }

    tracing::debug!(text_len = raw_text.len(), "No reading candidate");
    ReadingCandidate::none()
}

fn decimal(text: &str) -> Option<String> {
    DECIMAL
        .find_iter(text)
        .find(|m| clean_neighbours(text, m.start(), m.end()) && is_positive(m.as_str()))
        .map(|m| m.as_str().to_string())
}

fn gallons_adjacent(text: &str) -> Option<String> {
    GALLONS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(',', ""))
}

fn digit_run(text: &str) -> Option<String> {
    DIGIT_RUN
        .find_iter(text)
        .find(|m| clean_neighbours(text, m.start(), m.end()) && is_positive(m.as_str()))
        .map(|m| m.as_str().to_string())
}

/// OCR often reads the decimal point of a register as a space: `0456 78`.
fn split_decimal(text: &str) -> Option<String> {
    SPLIT_DECIMAL.captures_iter(text).find_map(|caps| {
        let whole = caps.get(1)?.as_str();
        let fraction = caps.get(2)?.as_str();
        (fraction.len() <= MAX_SPLIT_FRACTION_DIGITS).then(|| format!("{whole}.{fraction}"))
    })
}

/// True when neither neighbour of `text[start..end]` is an excluded symbol.
fn clean_neighbours(text: &str, start: usize, end: usize) -> bool {
    let excluded = |c: char| EXCLUDED_NEIGHBOURS.contains(&c);
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| excluded(c)) && !after.is_some_and(|c| excluded(c))
}

fn is_positive(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(|v| v > 0.0)
}
