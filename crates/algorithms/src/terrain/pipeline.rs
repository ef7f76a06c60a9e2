//! End-to-end landform pipeline
//!
//! DEM → slope, aspect → heat load; DEM → fine TPI and multi-scale mean
//! TPI; all four → landform classes.

use super::aspect::{aspect, AspectOutput};
use super::hli::{hli, HliParams};
use super::landform::{classify_landforms_with, LandformThresholds};
use super::slope::{slope, SlopeParams, SlopeUnits};
use super::tpi::{multiscale_tpi, topographic_position, MultiscaleTpiParams};
use geoform_core::raster::{Neighborhood, Raster};
use geoform_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Parameters for the full landform pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Must report degrees; `z_factor` is free
    pub slope: SlopeParams,
    pub hli: HliParams,
    /// Radii of the standardized TPI that feeds the mean TPI
    pub multiscale: MultiscaleTpiParams,
    /// Radius of the raw TPI bucketed directly
    pub fine_radius: usize,
    pub thresholds: LandformThresholds,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            slope: SlopeParams::default(),
            hli: HliParams::default(),
            multiscale: MultiscaleTpiParams::default(),
            fine_radius: 3,
            thresholds: LandformThresholds::default(),
        }
    }
}

impl PipelineParams {
    pub fn validate(&self) -> Result<()> {
        if self.slope.units != SlopeUnits::Degrees {
            return Err(Error::invalid_parameter(
                "slope.units",
                format!("{:?}", self.slope.units),
                "landform buckets expect slope in degrees",
            ));
        }
        Neighborhood::square(self.fine_radius)?;
        self.multiscale.validate()?;
        self.thresholds.validate()
    }

    /// Cells of context a tile needs for its core to match a whole-raster run
    pub fn halo(&self) -> usize {
        self.multiscale.max_radius().max(self.fine_radius) + 1
    }
}

/// Every raster the pipeline produces, aligned with the input DEM
#[derive(Debug, Clone)]
pub struct LandformProducts {
    /// Degrees
    pub slope: Raster<f64>,
    /// Degrees clockwise from north
    pub aspect: Raster<f64>,
    pub hli: Raster<f64>,
    /// Raw TPI at the fine radius
    pub tpi: Raster<f64>,
    pub mean_tpi: Raster<f64>,
    /// Landform codes 11..=42
    pub landforms: Raster<f64>,
}

/// Run every stage on a DEM
pub fn landform_pipeline(dem: &Raster<f64>, params: PipelineParams) -> Result<LandformProducts> {
    params.validate()?;
    let start = Instant::now();
    let (rows, cols) = dem.shape();

    tracing::debug!("slope");
    let slope_deg = slope(dem, params.slope)?;

    tracing::debug!("aspect");
    let aspect_deg = aspect(dem, AspectOutput::Degrees)?;

    tracing::debug!("heat load index");
    let heat_load = hli(&slope_deg, &aspect_deg, params.hli)?;

    tracing::debug!("fine TPI, radius {}", params.fine_radius);
    let fine_tpi = topographic_position(dem, params.fine_radius)?;

    tracing::debug!("multi-scale TPI, radii {:?}", params.multiscale.radii);
    let mean = multiscale_tpi(dem, params.multiscale)?;

    tracing::debug!("landform classification");
    let landforms = classify_landforms_with(dem, &slope_deg, &heat_load, &mean, &fine_tpi, &params.thresholds)?;

    tracing::info!(
        "landform pipeline on {}x{} cells in {:.2?}",
        cols,
        rows,
        start.elapsed()
    );

    Ok(LandformProducts {
        slope: slope_deg,
        aspect: aspect_deg,
        hli: heat_load,
        tpi: fine_tpi,
        mean_tpi: mean,
        landforms,
    })
}

/// Landform classification from a DEM
#[derive(Debug, Clone, Default)]
pub struct Landform;

impl Algorithm for Landform {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = PipelineParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Landform"
    }

    fn description(&self) -> &'static str {
        "Landform classes from slope, heat load and multi-scale topographic position"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        Ok(landform_pipeline(&input, params)?.landforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoform_core::GeoTransform;

    fn cone(size: usize) -> Raster<f64> {
        let c = (size / 2) as f64;
        let mut dem = Raster::new(size, size);
        dem.set_transform(GeoTransform::new(0.0, size as f64 * 30.0, 30.0, -30.0));
        for row in 0..size {
            for col in 0..size {
                let d = ((row as f64 - c).powi(2) + (col as f64 - c).powi(2)).sqrt();
                dem.set(row, col, 1500.0 - 40.0 * d).unwrap();
            }
        }
        dem
    }

    fn small_params() -> PipelineParams {
        PipelineParams {
            multiscale: MultiscaleTpiParams { radii: [1, 3, 9] },
            fine_radius: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_products_aligned() {
        let dem = cone(31);
        let products = landform_pipeline(&dem, small_params()).unwrap();

        for r in [
            &products.slope,
            &products.aspect,
            &products.hli,
            &products.tpi,
            &products.mean_tpi,
            &products.landforms,
        ] {
            assert_eq!(r.shape(), dem.shape());
            assert_eq!(r.transform(), dem.transform());
        }
    }

    #[test]
    fn test_summit_is_flat_peak() {
        let dem = cone(31);
        let products = landform_pipeline(&dem, small_params()).unwrap();

        // Zero gradient at the apex, well above every neighborhood: 2344
        assert_eq!(products.slope.get(15, 15).unwrap(), 0.0);
        assert!(products.mean_tpi.get(15, 15).unwrap() > 0.0);
        assert_eq!(products.landforms.get(15, 15).unwrap(), 11.0);
    }

    #[test]
    fn test_masked_elevation_propagates() {
        let mut dem = cone(31);
        dem.set(10, 10, f64::NAN).unwrap();
        let products = landform_pipeline(&dem, small_params()).unwrap();

        assert!(products.slope.get(10, 10).unwrap().is_nan());
        assert!(products.aspect.get(10, 10).unwrap().is_nan());
        assert!(products.hli.get(10, 10).unwrap().is_nan());
        assert!(products.tpi.get(10, 10).unwrap().is_nan());
        assert!(products.mean_tpi.get(10, 10).unwrap().is_nan());
        assert!(products.landforms.get(10, 10).unwrap().is_nan());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let dem = cone(11);

        let p = PipelineParams { fine_radius: 0, ..small_params() };
        assert!(landform_pipeline(&dem, p).is_err());

        let p = PipelineParams {
            multiscale: MultiscaleTpiParams { radii: [3, 3, 9] },
            ..small_params()
        };
        assert!(landform_pipeline(&dem, p).is_err());

        let p = PipelineParams {
            slope: SlopeParams { units: SlopeUnits::Percent, z_factor: 1.0 },
            ..small_params()
        };
        assert!(matches!(landform_pipeline(&dem, p), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_algorithm_interface() {
        let landforms = Landform.execute(cone(31), small_params()).unwrap();
        assert_eq!(Landform.name(), "Landform");
        assert_eq!(landforms.get(15, 15).unwrap(), 11.0);
    }

    #[test]
    fn test_halo() {
        assert_eq!(PipelineParams::default().halo(), 28);
        assert_eq!(small_params().halo(), 10);
    }
}
