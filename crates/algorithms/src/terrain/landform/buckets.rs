//! Per-variable buckets and the composite signature
//!
//! Each input falls into one coded bucket; the four codes occupy distinct
//! decimal places, so their sum identifies the combination:
//!
//! | variable | buckets |
//! |---|---|
//! | slope (°) | `<= 2` → 2000, `(2, 50]` → 1000, `> 50` → 5000 |
//! | heat load | `<= 0.448` → 100, `(0.448, 0.767]` → 200, `> 0.767` → 300 |
//! | mean TPI | `<= -1.2` → 10, `(-1.2, -0.75]` → 20, `(-0.75, 0]` → 30, `> 0` → 40 |
//! | TPI | `<= -5` → 1, `(-5, 0]` → 2, `(0, 30]` → 3, `(30, 300]` → 4, `> 300` → 5 |
//!
//! `NaN` falls in no bucket.

use geoform_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper (inclusive) bounds of the buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandformThresholds {
    /// Slopes at or below this are flat (2000)
    pub slope_flat: f64,
    /// Slopes above this are cliffs (5000)
    pub slope_steep: f64,
    /// Cool / neutral / warm heat load cut points
    pub hli: [f64; 2],
    pub mean_tpi: [f64; 3],
    pub tpi: [f64; 4],
}

impl LandformThresholds {
    pub const DEFAULT: LandformThresholds = LandformThresholds {
        slope_flat: 2.0,
        slope_steep: 50.0,
        hli: [0.448, 0.767],
        mean_tpi: [-1.2, -0.75, 0.0],
        tpi: [-5.0, 0.0, 30.0, 300.0],
    };

    /// Every list strictly increasing and the flat limit below the steep one
    pub fn validate(&self) -> Result<()> {
        fn increasing(values: &[f64]) -> bool {
            values.iter().all(|v| v.is_finite()) && values.windows(2).all(|w| w[0] < w[1])
        }

        let checks: [(&'static str, bool, String); 4] = [
            (
                "slope_thresholds",
                increasing(&[self.slope_flat, self.slope_steep]),
                format!("[{}, {}]", self.slope_flat, self.slope_steep),
            ),
            ("hli_thresholds", increasing(&self.hli), format!("{:?}", self.hli)),
            ("mean_tpi_thresholds", increasing(&self.mean_tpi), format!("{:?}", self.mean_tpi)),
            ("tpi_thresholds", increasing(&self.tpi), format!("{:?}", self.tpi)),
        ];

        for (name, ok, value) in checks {
            if !ok {
                return Err(Error::invalid_parameter(name, value, "must be finite and strictly increasing"));
            }
        }
        Ok(())
    }

    pub fn slope_bucket(&self, slope_deg: f64) -> Option<u16> {
        if slope_deg <= self.slope_flat {
            Some(2000)
        } else if slope_deg <= self.slope_steep {
            Some(1000)
        } else if slope_deg > self.slope_steep {
            Some(5000)
        } else {
            None
        }
    }

    pub fn hli_bucket(&self, hli: f64) -> Option<u16> {
        bucket(hli, &self.hli, 100)
    }

    pub fn mean_tpi_bucket(&self, mean_tpi: f64) -> Option<u16> {
        bucket(mean_tpi, &self.mean_tpi, 10)
    }

    pub fn tpi_bucket(&self, tpi: f64) -> Option<u16> {
        bucket(tpi, &self.tpi, 1)
    }

    /// Composite signature of one cell, or `None` if any input is `NaN`
    pub fn composite(&self, slope_deg: f64, hli: f64, mean_tpi: f64, tpi: f64) -> Option<u16> {
        Some(composite_signature([
            self.slope_bucket(slope_deg)?,
            self.hli_bucket(hli)?,
            self.mean_tpi_bucket(mean_tpi)?,
            self.tpi_bucket(tpi)?,
        ]))
    }
}

impl Default for LandformThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `unit * k` for the first bound `value` does not exceed (k from 1),
/// `unit * (len + 1)` above the last bound.
fn bucket(value: f64, bounds: &[f64], unit: u16) -> Option<u16> {
    if value.is_nan() {
        return None;
    }
    let k = bounds.iter().position(|&b| value <= b).unwrap_or(bounds.len());
    Some(unit * (k as u16 + 1))
}

/// Sum of the four bucket codes
pub fn composite_signature(buckets: [u16; 4]) -> u16 {
    buckets.iter().sum()
}

pub fn slope_bucket(slope_deg: f64) -> Option<u16> {
    LandformThresholds::DEFAULT.slope_bucket(slope_deg)
}

pub fn hli_bucket(hli: f64) -> Option<u16> {
    LandformThresholds::DEFAULT.hli_bucket(hli)
}

pub fn mean_tpi_bucket(mean_tpi: f64) -> Option<u16> {
    LandformThresholds::DEFAULT.mean_tpi_bucket(mean_tpi)
}

pub fn tpi_bucket(tpi: f64) -> Option<u16> {
    LandformThresholds::DEFAULT.tpi_bucket(tpi)
}
