//! Heat Load Index (McCune & Keon 2002, equation 3)
//!
//! Potential direct incident radiation from slope, aspect and latitude,
//! with aspect folded about the south-west axis (225° + 22.5°) so that
//! south-west faces are the warmest:
//!
//! ```text
//! folded = |π − |aspect − 4.3196899||
//! raw    = 1.582·cos(lat)·cos(slope) − 1.5·sin(lat)·cos(folded)·sin(slope)
//!        − 0.262·sin(lat)·sin(slope) + 0.607·sin(folded)·sin(slope) − 1.467
//! hli    = exp(raw)
//! ```

use crate::cellwise::combine;
use geoform_core::raster::Raster;
use geoform_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Aspect of maximum heat load, in radians (247.5°)
const FOLD_AXIS: f64 = 4.3196899;

/// Latitude terms of the heat load equation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HliParams {
    pub cos_lat: f64,
    pub sin_lat: f64,
}

impl Default for HliParams {
    /// The published coefficients (about 34° of latitude)
    fn default() -> Self {
        Self {
            cos_lat: 0.828870,
            sin_lat: 0.559442,
        }
    }
}

impl HliParams {
    /// Latitude terms for a site at `latitude` degrees
    pub fn from_latitude(latitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::invalid_parameter(
                "latitude",
                latitude,
                "must be within [-90, 90] degrees",
            ));
        }
        let lat = latitude.to_radians();
        Ok(Self {
            cos_lat: lat.cos(),
            sin_lat: lat.sin(),
        })
    }

    /// Heat load for one cell; slope and aspect in degrees
    pub fn evaluate(&self, slope_deg: f64, aspect_deg: f64) -> f64 {
        let slope = slope_deg.to_radians();
        let aspect = aspect_deg.to_radians();
        let folded = (PI - (aspect - FOLD_AXIS).abs()).abs();

        let raw = 1.582 * self.cos_lat * slope.cos()
            - 1.5 * self.sin_lat * folded.cos() * slope.sin()
            - 0.262 * self.sin_lat * slope.sin()
            + 0.607 * folded.sin() * slope.sin()
            - 1.467;

        raw.exp()
    }
}

/// Heat load for one cell with the default latitude terms
pub fn heat_load_index(slope_deg: f64, aspect_deg: f64) -> f64 {
    HliParams::default().evaluate(slope_deg, aspect_deg)
}

/// Heat load raster from slope and aspect rasters (both in degrees).
///
/// A cell that is no-data in either input is no-data in the output.
pub fn hli(slope_deg: &Raster<f64>, aspect_deg: &Raster<f64>, params: HliParams) -> Result<Raster<f64>> {
    combine([slope_deg, aspect_deg], |[s, a]| params.evaluate(s, a))
}

/// Heat load algorithm over a `(slope, aspect)` pair
#[derive(Debug, Clone, Default)]
pub struct Hli;

impl Algorithm for Hli {
    type Input = (Raster<f64>, Raster<f64>);
    type Output = Raster<f64>;
    type Params = HliParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "HLI"
    }

    fn description(&self) -> &'static str {
        "Heat Load Index from slope and aspect (McCune & Keon 2002)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        hli(&input.0, &input.1, params)
    }
}
