use serde::{Deserialize, Serialize};

use crate::models::enums::{FlowPhase, MeterConstructionClass};

/// Inclusive accuracy-percentage range a test phase must land in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub min_percent: f64,
    pub max_percent: f64,
}

impl ToleranceBand {
    pub const fn new(min_percent: f64, max_percent: f64) -> Self {
        Self {
            min_percent,
            max_percent,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, accuracy_percent: f64) -> bool {
        accuracy_percent >= self.min_percent && accuracy_percent <= self.max_percent
    }
}

/// Upper bound of the PD / Single-Jet low-flow band.
///
/// Two presentation views in the field application disagree (101.5 vs 101.0).
/// `Standard` is the default until the product owner confirms one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowFlowVariant {
    #[default]
    Standard,
    Narrow,
}

impl LowFlowVariant {
    pub fn max_percent(&self) -> f64 {
        match self {
            Self::Standard => 101.5,
            Self::Narrow => 101.0,
        }
    }
}

const BAND_NORMAL: ToleranceBand = ToleranceBand::new(98.5, 101.5);
const BAND_WIDE: ToleranceBand = ToleranceBand::new(97.0, 103.0);
const BAND_LOW_STD: ToleranceBand = ToleranceBand::new(95.0, 101.5);
const BAND_LOW_NARROW: ToleranceBand = ToleranceBand::new(95.0, 101.0);
const BAND_MAG: ToleranceBand = ToleranceBand::new(95.0, 105.0);

/// Bands for one construction class, indexed by phase.
#[derive(Debug, Clone, Copy)]
struct ClassRow {
    low: ToleranceBand,
    mid: ToleranceBand,
    high: ToleranceBand,
}

impl ClassRow {
    const fn split(low: ToleranceBand, rest: ToleranceBand) -> Self {
        Self {
            low,
            mid: rest,
            high: rest,
        }
    }

    fn band(&self, phase: FlowPhase) -> ToleranceBand {
        match phase {
            FlowPhase::Low => self.low,
            FlowPhase::Mid => self.mid,
            FlowPhase::High => self.high,
        }
    }
}

/// Row every class without its own entry resolves through.
const OTHER_ROW: ClassRow = ClassRow {
    low: BAND_LOW_NARROW,
    mid: ToleranceBand::new(97.0, 101.5),
    high: BAND_NORMAL,
};

/// Decision table mapping (construction class, flow phase) to a band.
///
/// Lookup is total: any class without a dedicated row uses the `Other` row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToleranceTable {
    pub pd_low_flow: LowFlowVariant,
}

impl ToleranceTable {
    pub fn new(pd_low_flow: LowFlowVariant) -> Self {
        Self { pd_low_flow }
    }

    pub fn lookup(&self, class: MeterConstructionClass, phase: FlowPhase) -> ToleranceBand {
        self.row(class).unwrap_or(OTHER_ROW).band(phase)
    }

    fn row(&self, class: MeterConstructionClass) -> Option<ClassRow> {
        use MeterConstructionClass::*;

        let row = match class {
            PositiveDisplacementOrSingleJet => ClassRow::split(
                ToleranceBand::new(95.0, self.pd_low_flow.max_percent()),
                BAND_NORMAL,
            ),
            MultiJet => ClassRow::split(BAND_WIDE, BAND_NORMAL),
            Turbine => ClassRow::split(BAND_NORMAL, BAND_NORMAL),
            ElectromagneticOrUltrasonic => ClassRow::split(BAND_MAG, BAND_NORMAL),
            FireService => ClassRow::split(BAND_LOW_STD, BAND_NORMAL),
            Compound => ClassRow {
                low: BAND_LOW_NARROW,
                mid: BAND_NORMAL,
                high: BAND_WIDE,
            },
            Other => return None,
        };
        Some(row)
    }
}

/// Lookup against the default table.
pub fn lookup(class: MeterConstructionClass, phase: FlowPhase) -> ToleranceBand {
    ToleranceTable::default().lookup(class, phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::MeterConstructionClass::*;

    fn band(min: f64, max: f64) -> ToleranceBand {
        ToleranceBand::new(min, max)
    }

    #[test]
    fn every_pair_has_ordered_band() {
        for variant in [LowFlowVariant::Standard, LowFlowVariant::Narrow] {
            let table = ToleranceTable::new(variant);
            for &class in MeterConstructionClass::ALL {
                for &phase in FlowPhase::ALL {
                    let b = table.lookup(class, phase);
                    assert!(
                        b.min_percent <= b.max_percent,
                        "{class} / {phase}: {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn observed_bands_reproduced() {
        let cases = [
            (PositiveDisplacementOrSingleJet, FlowPhase::Low, band(95.0, 101.5)),
            (PositiveDisplacementOrSingleJet, FlowPhase::Mid, band(98.5, 101.5)),
            (PositiveDisplacementOrSingleJet, FlowPhase::High, band(98.5, 101.5)),
            (MultiJet, FlowPhase::Low, band(97.0, 103.0)),
            (MultiJet, FlowPhase::High, band(98.5, 101.5)),
            (Turbine, FlowPhase::Low, band(98.5, 101.5)),
            (Turbine, FlowPhase::Mid, band(98.5, 101.5)),
            (ElectromagneticOrUltrasonic, FlowPhase::Low, band(95.0, 105.0)),
            (ElectromagneticOrUltrasonic, FlowPhase::Mid, band(98.5, 101.5)),
            (FireService, FlowPhase::Low, band(95.0, 101.5)),
            (FireService, FlowPhase::High, band(98.5, 101.5)),
            (Compound, FlowPhase::Low, band(95.0, 101.0)),
            (Compound, FlowPhase::Mid, band(98.5, 101.5)),
            (Compound, FlowPhase::High, band(97.0, 103.0)),
            (Other, FlowPhase::Low, band(95.0, 101.0)),
            (Other, FlowPhase::Mid, band(97.0, 101.5)),
            (Other, FlowPhase::High, band(98.5, 101.5)),
        ];
        for (class, phase, expected) in cases {
            assert_eq!(lookup(class, phase), expected, "{class} / {phase}");
        }
    }

    #[test]
    fn narrow_variant_only_touches_pd_low_flow() {
        let standard = ToleranceTable::default();
        let narrow = ToleranceTable::new(LowFlowVariant::Narrow);

        assert_eq!(
            narrow.lookup(PositiveDisplacementOrSingleJet, FlowPhase::Low),
            band(95.0, 101.0)
        );
        for &class in MeterConstructionClass::ALL {
            for &phase in FlowPhase::ALL {
                if class == PositiveDisplacementOrSingleJet && phase == FlowPhase::Low {
                    continue;
                }
                assert_eq!(standard.lookup(class, phase), narrow.lookup(class, phase));
            }
        }
    }

    #[test]
    fn unrecognized_class_string_uses_other_row() {
        let class = MeterConstructionClass::from_persisted("vortex");
        for &phase in FlowPhase::ALL {
            assert_eq!(lookup(class, phase), OTHER_ROW.band(phase));
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let b = band(98.5, 101.5);
        assert!(b.contains(98.5));
        assert!(b.contains(101.5));
        assert!(!b.contains(98.49));
        assert!(!b.contains(101.51));
    }
}
