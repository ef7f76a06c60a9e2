//! Slope calculation from DEMs
//!
//! Rate of change of elevation using the Horn (1981) 3x3 method.

use super::horn::horn_gradient;
use crate::maybe_rayon::*;
use geoform_core::raster::Raster;
use geoform_core::{Algorithm, Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Units for slope output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlopeUnits {
    /// Degrees (0-90)
    #[default]
    Degrees,
    /// Percent (0-infinity)
    Percent,
    /// Radians (0-π/2)
    Radians,
}

/// Parameters for slope calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeParams {
    /// Output units. The heat load index and the landform buckets expect degrees.
    pub units: SlopeUnits,
    /// Multiplier on the cell size, e.g. ~111320 for lat/lon DEMs with
    /// elevations in metres
    pub z_factor: f64,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self {
            units: SlopeUnits::Degrees,
            z_factor: 1.0,
        }
    }
}

/// Slope algorithm
#[derive(Debug, Clone, Default)]
pub struct Slope;

impl Algorithm for Slope {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = SlopeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Slope"
    }

    fn description(&self) -> &'static str {
        "Calculate slope (rate of change of elevation) from a DEM using Horn's method"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        slope(&input, params)
    }
}

/// Calculate slope from a DEM
///
/// dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize)
/// dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize)
/// slope = atan(sqrt(dz/dx² + dz/dy²))
///
/// Cells on the outer ring, and cells with a no-data neighbor, are `NaN`.
pub fn slope(dem: &Raster<f64>, params: SlopeParams) -> Result<Raster<f64>> {
    if !(params.z_factor.is_finite() && params.z_factor > 0.0) {
        return Err(Error::invalid_parameter(
            "z_factor",
            params.z_factor,
            "must be a positive finite number",
        ));
    }

    let (rows, cols) = dem.shape();
    let eight_cell_size = 8.0 * dem.cell_size() * params.z_factor;

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                let Some(g) = horn_gradient(dem, row, col) else {
                    continue;
                };

                let dz_dx = g.dz_dx / eight_cell_size;
                let dz_dy = g.dz_dy / eight_cell_size;
                let slope_rad = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan();

                *out = match params.units {
                    SlopeUnits::Degrees => slope_rad.to_degrees(),
                    SlopeUnits::Percent => slope_rad.tan() * 100.0,
                    SlopeUnits::Radians => slope_rad,
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
