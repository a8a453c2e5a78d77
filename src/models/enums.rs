use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Variants keep their declaration order in `ALL`; serde uses the same strings.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(MeterConstructionClass {
    PositiveDisplacementOrSingleJet => "positive_displacement_or_single_jet",
    MultiJet => "multi_jet",
    Turbine => "turbine",
    ElectromagneticOrUltrasonic => "electromagnetic_or_ultrasonic",
    FireService => "fire_service",
    Compound => "compound",
    Other => "other",
});

impl MeterConstructionClass {
    /// Lenient parse of an operator-selected or persisted class string.
    ///
    /// Unknown strings resolve to `Other` so a calibration run is never blocked
    /// by an unrecognized class.
    pub fn from_persisted(s: &str) -> Self {
        let key = s.trim().to_lowercase();
        match key.parse::<Self>() {
            Ok(class) => class,
            Err(_) => {
                tracing::debug!(value = %key, "Unrecognized construction class, using Other");
                Self::Other
            }
        }
    }
}

str_enum!(FlowPhase {
    Low => "low",
    Mid => "mid",
    High => "high",
});

str_enum!(ReadingStage {
    Decimal => "decimal",
    GallonsAdjacent => "gallons_adjacent",
    DigitRun => "digit_run",
    SplitDecimalReconstruction => "split_decimal_reconstruction",
    None => "none",
});

str_enum!(Manufacturer {
    Badger => "badger",
    Neptune => "neptune",
    Sensus => "sensus",
    Elster => "elster",
    Itron => "itron",
    Kamstrup => "kamstrup",
    MasterMeter => "master_meter",
    Mueller => "mueller",
    Zenner => "zenner",
    Diehl => "diehl",
});

impl Manufacturer {
    /// Name as printed on the meter face.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Badger => "Badger",
            Self::Neptune => "Neptune",
            Self::Sensus => "Sensus",
            Self::Elster => "Elster",
            Self::Itron => "Itron",
            Self::Kamstrup => "Kamstrup",
            Self::MasterMeter => "Master Meter",
            Self::Mueller => "Mueller",
            Self::Zenner => "Zenner",
            Self::Diehl => "Diehl",
        }
    }
}

str_enum!(NominalSize {
    FiveEighthsByThreeQuarters => "5/8x3/4",
    FiveEighths => "5/8",
    ThreeQuarters => "3/4",
    OneAndHalf => "1-1/2",
    One => "1",
    Two => "2",
    Three => "3",
    Four => "4",
    Six => "6",
    Eight => "8",
});

impl NominalSize {
    /// Size as printed on the meter face, inch mark included.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FiveEighthsByThreeQuarters => "5/8\" x 3/4\"",
            Self::FiveEighths => "5/8\"",
            Self::ThreeQuarters => "3/4\"",
            Self::OneAndHalf => "1-1/2\"",
            Self::One => "1\"",
            Self::Two => "2\"",
            Self::Three => "3\"",
            Self::Four => "4\"",
            Self::Six => "6\"",
            Self::Eight => "8\"",
        }
    }
}
