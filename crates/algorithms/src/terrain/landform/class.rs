//! The fifteen landform classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Landform class, numbered as `10 * group + variant`.
///
/// Groups: 1 peaks, ridges and cliffs; 2 upper slopes; 3 lower slopes;
/// 4 valleys. Warm and cool variants follow the heat load index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LandformClass {
    PeakRidgeWarm = 11,
    PeakRidge = 12,
    PeakRidgeCool = 13,
    MountainDivide = 14,
    Cliff = 15,
    UpperSlopeWarm = 21,
    UpperSlope = 22,
    UpperSlopeCool = 23,
    UpperSlopeFlat = 24,
    LowerSlopeWarm = 31,
    LowerSlope = 32,
    LowerSlopeCool = 33,
    LowerSlopeFlat = 34,
    Valley = 41,
    ValleyNarrow = 42,
}

impl LandformClass {
    /// Every class in code order
    pub const ALL: [LandformClass; 15] = [
        LandformClass::PeakRidgeWarm,
        LandformClass::PeakRidge,
        LandformClass::PeakRidgeCool,
        LandformClass::MountainDivide,
        LandformClass::Cliff,
        LandformClass::UpperSlopeWarm,
        LandformClass::UpperSlope,
        LandformClass::UpperSlopeCool,
        LandformClass::UpperSlopeFlat,
        LandformClass::LowerSlopeWarm,
        LandformClass::LowerSlope,
        LandformClass::LowerSlopeCool,
        LandformClass::LowerSlopeFlat,
        LandformClass::Valley,
        LandformClass::ValleyNarrow,
    ];

    /// Numeric landform code (11..=42)
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Class for a raster value; only exact integral codes match
    pub fn from_value(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
            return None;
        }
        Self::from_code(value as u8)
    }

    /// Position in [`LandformClass::ALL`] (0..=14)
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&c| c == self).unwrap_or_default()
    }

    /// Coarse group: 0 peaks/ridges/cliffs, 1 upper slopes, 2 lower slopes, 3 valleys
    pub fn group(self) -> u8 {
        self.code() / 10 - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            LandformClass::PeakRidgeWarm => "Peak/ridge (warm)",
            LandformClass::PeakRidge => "Peak/ridge",
            LandformClass::PeakRidgeCool => "Peak/ridge (cool)",
            LandformClass::MountainDivide => "Mountain/divide",
            LandformClass::Cliff => "Cliff",
            LandformClass::UpperSlopeWarm => "Upper slope (warm)",
            LandformClass::UpperSlope => "Upper slope",
            LandformClass::UpperSlopeCool => "Upper slope (cool)",
            LandformClass::UpperSlopeFlat => "Upper slope (flat)",
            LandformClass::LowerSlopeWarm => "Lower slope (warm)",
            LandformClass::LowerSlope => "Lower slope",
            LandformClass::LowerSlopeCool => "Lower slope (cool)",
            LandformClass::LowerSlopeFlat => "Lower slope (flat)",
            LandformClass::Valley => "Valley",
            LandformClass::ValleyNarrow => "Valley (narrow)",
        }
    }
}

impl fmt::Display for LandformClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_and_order() {
        for (i, class) in LandformClass::ALL.iter().enumerate() {
            assert_eq!(LandformClass::from_code(class.code()), Some(*class));
            assert_eq!(class.index(), i);
        }
        assert!(LandformClass::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(LandformClass::from_code(16), None);
        assert_eq!(LandformClass::from_code(0), None);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(LandformClass::from_value(32.0), Some(LandformClass::LowerSlope));
        assert_eq!(LandformClass::from_value(32.5), None);
        assert_eq!(LandformClass::from_value(f64::NAN), None);
        assert_eq!(LandformClass::from_value(-11.0), None);
    }

    #[test]
    fn test_groups() {
        assert_eq!(LandformClass::Cliff.group(), 0);
        assert_eq!(LandformClass::UpperSlopeFlat.group(), 1);
        assert_eq!(LandformClass::LowerSlopeWarm.group(), 2);
        assert_eq!(LandformClass::ValleyNarrow.group(), 3);
        assert_eq!(LandformClass::Valley.to_string(), "Valley (41)");
    }
}
