//! Aspect calculation from DEMs
//!
//! Direction of steepest descent using the Horn (1981) method.

use super::horn::horn_gradient;
use crate::maybe_rayon::*;
use geoform_core::raster::Raster;
use geoform_core::{Algorithm, Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Gradient magnitude (in raw Horn units) below which a cell counts as flat
const FLAT_THRESHOLD: f64 = 1e-10;

/// Output format for aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectOutput {
    /// Degrees (0-360, 0=North, clockwise)
    #[default]
    Degrees,
    /// Radians (0-2π)
    Radians,
}

/// Aspect algorithm
#[derive(Debug, Clone, Default)]
pub struct Aspect;

impl Algorithm for Aspect {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = AspectOutput;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Aspect"
    }

    fn description(&self) -> &'static str {
        "Calculate aspect (direction of steepest descent) from a DEM"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        aspect(&input, params)
    }
}

/// Calculate aspect from a DEM
///
/// Aspect is measured clockwise from north:
/// - 0° = North
/// - 90° = East
/// - 180° = South
/// - 270° = West
///
/// Flat cells get `0.0`; with zero slope the aspect terms of the heat load
/// index vanish, so the value only has to be finite. Outer ring and cells
/// next to no-data are `NaN`.
pub fn aspect(dem: &Raster<f64>, output_format: AspectOutput) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                let Some(g) = horn_gradient(dem, row, col) else {
                    continue;
                };

                if g.dz_dx.abs() < FLAT_THRESHOLD && g.dz_dy.abs() < FLAT_THRESHOLD {
                    *out = 0.0;
                    continue;
                }

                // Descent direction in (east, north): east = -dz_dx, and
                // north = dz_dy because row index grows southward.
                let bearing = (-g.dz_dx).atan2(g.dz_dy);
                let bearing = if bearing < 0.0 { bearing + 2.0 * PI } else { bearing };

                *out = match output_format {
                    AspectOutput::Degrees => bearing.to_degrees(),
                    AspectOutput::Radians => bearing,
                };
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() = Array2::from_shape_vec((rows, cols), output_data)?;

    Ok(output)
}
