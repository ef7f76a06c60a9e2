//! Topographic Position Index (TPI)
//!
//! TPI measures the difference between the elevation of a cell and the mean
//! elevation of its neighborhood (centre included):
//!
//!   TPI = z - mean(window)
//!
//! - Positive TPI: higher than its surroundings (ridge, hilltop)
//! - Negative TPI: lower than its surroundings (valley, depression)
//!
//! The multi-scale variant standardizes TPI at three radii by the local
//! standard deviation and averages the three z-scores.
//! Reference: Weiss (2001) "Topographic Position and Landforms Analysis"

use crate::cellwise::combine;
use crate::statistics::{neighborhood_mean, neighborhood_stats};
use geoform_core::raster::Raster;
use geoform_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};

/// Standard deviations at or below this are treated as zero
pub const STDDEV_EPSILON: f64 = 1e-10;

/// Radii (in cells) of the three scales of the multi-scale TPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiscaleTpiParams {
    pub radii: [usize; 3],
}

impl Default for MultiscaleTpiParams {
    fn default() -> Self {
        Self::tripling(3)
    }
}

impl MultiscaleTpiParams {
    /// Scales `r`, `3r`, `9r`
    pub fn tripling(r: usize) -> Self {
        Self {
            radii: [r, r * 3, r * 9],
        }
    }

    /// Scales from ground distances (same units as the cell size)
    pub fn from_distances(distances: [f64; 3], cell_size: f64) -> Result<Self> {
        let mut radii = [0usize; 3];
        for (radius, &distance) in radii.iter_mut().zip(distances.iter()) {
            *radius = radius_for_distance(distance, cell_size)?;
        }
        let params = Self { radii };
        params.validate()?;
        Ok(params)
    }

    /// Every radius at least 1 and strictly increasing
    pub fn validate(&self) -> Result<()> {
        let [r1, r2, r3] = self.radii;
        if r1 == 0 {
            return Err(Error::invalid_parameter(
                "radii",
                format!("{:?}", self.radii),
                "every radius must be at least 1 cell",
            ));
        }
        if !(r1 < r2 && r2 < r3) {
            return Err(Error::invalid_parameter(
                "radii",
                format!("{:?}", self.radii),
                "radii must be strictly increasing",
            ));
        }
        Ok(())
    }

    /// Largest radius, which is also the halo a tile needs
    pub fn max_radius(&self) -> usize {
        self.radii[2]
    }
}

/// Radius in cells for a ground distance, rounded, never below 1
pub fn radius_for_distance(distance: f64, cell_size: f64) -> Result<usize> {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(Error::invalid_parameter("cell_size", cell_size, "must be positive"));
    }
    if !(distance.is_finite() && distance > 0.0) {
        return Err(Error::invalid_parameter("distance", distance, "must be positive"));
    }
    Ok(((distance / cell_size).round() as usize).max(1))
}

/// `raster - mean`, cell by cell
pub fn tpi(raster: &Raster<f64>, mean: &Raster<f64>) -> Result<Raster<f64>> {
    combine([raster, mean], |[z, m]| z - m)
}

/// `(raster - mean) / stddev`; `NaN` where the standard deviation is
/// zero (at or below [`STDDEV_EPSILON`]).
pub fn standardized_tpi(raster: &Raster<f64>, mean: &Raster<f64>, stddev: &Raster<f64>) -> Result<Raster<f64>> {
    combine([raster, mean, stddev], |[z, m, s]| {
        if s <= STDDEV_EPSILON { f64::NAN } else { (z - m) / s }
    })
}

/// Average of three standardized TPI rasters
pub fn mean_tpi(t1: &Raster<f64>, t2: &Raster<f64>, t3: &Raster<f64>) -> Result<Raster<f64>> {
    combine([t1, t2, t3], |[a, b, c]| (a + b + c) / 3.0)
}

/// Raw TPI of a DEM at one radius
pub fn topographic_position(dem: &Raster<f64>, radius: usize) -> Result<Raster<f64>> {
    let mean = neighborhood_mean(dem, radius)?;
    tpi(dem, &mean)
}

/// Standardized TPI at each of the three radii, averaged
pub fn multiscale_tpi(dem: &Raster<f64>, params: MultiscaleTpiParams) -> Result<Raster<f64>> {
    params.validate()?;

    let mut scales = Vec::with_capacity(3);
    for radius in params.radii {
        tracing::debug!("standardized TPI at radius {}", radius);
        let stats = neighborhood_stats(dem, radius)?;
        scales.push(standardized_tpi(dem, &stats.mean, &stats.stddev)?);
    }

    mean_tpi(&scales[0], &scales[1], &scales[2])
}

/// Raw TPI at a single radius
#[derive(Debug, Clone, Default)]
pub struct Tpi;

impl Algorithm for Tpi {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = usize;
    type Error = Error;

    fn name(&self) -> &'static str {
        "TPI"
    }

    fn description(&self) -> &'static str {
        "Topographic Position Index: elevation relative to neighborhood mean"
    }

    fn execute(&self, input: Self::Input, radius: Self::Params) -> Result<Self::Output> {
        topographic_position(&input, radius)
    }

    fn execute_default(&self, input: Self::Input) -> Result<Self::Output> {
        topographic_position(&input, 3)
    }
}

/// Mean of standardized TPI at three scales
#[derive(Debug, Clone, Default)]
pub struct MultiscaleTpi;

impl Algorithm for MultiscaleTpi {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = MultiscaleTpiParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "MultiscaleTPI"
    }

    fn description(&self) -> &'static str {
        "Mean of standardized TPI at three neighborhood radii"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        multiscale_tpi(&input, params)
    }
}
