//! Calibration decisions: tolerance bands per construction class and flow
//! phase, and the pass/fail judgement of a measured accuracy.

pub mod tolerance;
pub mod judge;

pub use tolerance::*;
pub use judge::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("Reference volume must be positive, got {0}")]
    NonPositiveReference(f64),

    #[error("Non-finite {field}: {value}")]
    NonFiniteInput { field: &'static str, value: f64 },
}
