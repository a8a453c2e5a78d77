use serde::{Deserialize, Serialize};

use super::tolerance::{ToleranceBand, ToleranceTable};
use super::CalibrationError;
use crate::models::enums::{FlowPhase, MeterConstructionClass};

/// Pass/fail decision for one test phase. Recomputed on request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestJudgement {
    pub accuracy_percent: f64,
    pub band: ToleranceBand,
    pub passes: bool,
}

impl TestJudgement {
    pub fn new(accuracy_percent: f64, band: ToleranceBand) -> Self {
        Self {
            accuracy_percent,
            band,
            passes: evaluate(accuracy_percent, band),
        }
    }
}

/// Inclusive band check on an already-rounded accuracy percentage.
///
/// NaN never passes.
pub fn evaluate(accuracy_percent: f64, band: ToleranceBand) -> bool {
    if accuracy_percent.is_nan() {
        tracing::warn!("Accuracy is NaN, judging as failing");
        return false;
    }
    band.contains(accuracy_percent)
}

/// Look up the band for `(class, phase)` and judge `accuracy_percent` against it.
pub fn judge(
    table: &ToleranceTable,
    class: MeterConstructionClass,
    phase: FlowPhase,
    accuracy_percent: f64,
) -> TestJudgement {
    let judgement = TestJudgement::new(accuracy_percent, table.lookup(class, phase));
    tracing::debug!(
        class = class.as_str(),
        phase = phase.as_str(),
        accuracy = accuracy_percent,
        passes = judgement.passes,
        "Test phase judged"
    );
    judgement
}

/// Registered volume as a percentage of the reference (tank or master meter) volume.
pub fn accuracy_percent(meter_volume: f64, reference_volume: f64) -> Result<f64, CalibrationError> {
    if !meter_volume.is_finite() {
        return Err(CalibrationError::NonFiniteInput {
            field: "meter_volume",
            value: meter_volume,
        });
    }
    if !reference_volume.is_finite() {
        return Err(CalibrationError::NonFiniteInput {
            field: "reference_volume",
            value: reference_volume,
        });
    }
    if reference_volume <= 0.0 {
        return Err(CalibrationError::NonPositiveReference(reference_volume));
    }
    Ok(meter_volume / reference_volume * 100.0)
}

/// One judged phase within a multi-phase test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseJudgement {
    pub phase: FlowPhase,
    pub judgement: TestJudgement,
}

/// All phases of one meter test, judged against the same construction class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub class: MeterConstructionClass,
    pub phases: Vec<PhaseJudgement>,
}

impl PhaseReport {
    /// Judge each `(phase, accuracy)` pair in input order.
    pub fn evaluate(
        table: &ToleranceTable,
        class: MeterConstructionClass,
        results: &[(FlowPhase, f64)],
    ) -> Self {
        let phases = results
            .iter()
            .map(|&(phase, accuracy)| PhaseJudgement {
                phase,
                judgement: judge(table, class, phase, accuracy),
            })
            .collect();
        Self { class, phases }
    }

    /// True when at least one phase was judged and every phase passes.
    pub fn overall_pass(&self) -> bool {
        !self.phases.is_empty() && self.phases.iter().all(|p| p.judgement.passes)
    }

    pub fn failing_phases(&self) -> Vec<FlowPhase> {
        self.phases
            .iter()
            .filter(|p| !p.judgement.passes)
            .map(|p| p.phase)
            .collect()
    }
}
