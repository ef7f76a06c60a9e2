//! Landform classification
//!
//! Slope, heat load, multi-scale mean TPI and fine-scale TPI are each cut
//! into coded buckets; the sum of the four codes (the composite signature)
//! selects one of fifteen landform classes through a fixed table.
//!
//! Reference: Theobald et al. (2015) "Ecologically-relevant maps of
//! landforms and physiographic diversity for climate adaptation planning"

mod buckets;
mod class;
mod remap;
mod table;

pub use buckets::{
    composite_signature, hli_bucket, mean_tpi_bucket, slope_bucket, tpi_bucket, LandformThresholds,
};
pub use class::LandformClass;
pub use remap::{
    remap_landforms, remap_landforms_raster, remap_landforms_simple, remap_landforms_simple_raster,
};
pub use table::landform_for_composite;

use crate::cellwise::combine;
use geoform_core::raster::Raster;
use geoform_core::Result;
use std::collections::BTreeMap;

/// Classify every cell with the default thresholds.
///
/// All five rasters must share a shape. Cells outside the elevation
/// footprint, cells with a no-data input and cells whose composite no
/// class claims are `NaN`; the rest hold the landform code (11..=42).
pub fn classify_landforms(
    dem: &Raster<f64>,
    slope_deg: &Raster<f64>,
    hli: &Raster<f64>,
    mean_tpi: &Raster<f64>,
    tpi: &Raster<f64>,
) -> Result<Raster<f64>> {
    classify_landforms_with(dem, slope_deg, hli, mean_tpi, tpi, &LandformThresholds::default())
}

/// [`classify_landforms`] with custom bucket thresholds
pub fn classify_landforms_with(
    dem: &Raster<f64>,
    slope_deg: &Raster<f64>,
    hli: &Raster<f64>,
    mean_tpi: &Raster<f64>,
    tpi: &Raster<f64>,
    thresholds: &LandformThresholds,
) -> Result<Raster<f64>> {
    thresholds.validate()?;

    combine([dem, slope_deg, hli, mean_tpi, tpi], |[_, s, h, m, t]| {
        thresholds
            .composite(s, h, m, t)
            .and_then(landform_for_composite)
            .map_or(f64::NAN, |class| f64::from(class.code()))
    })
}

/// Cell count per class; no-data and unknown codes are not counted
pub fn landform_histogram(landforms: &Raster<f64>) -> BTreeMap<LandformClass, usize> {
    let mut counts = BTreeMap::new();
    for class in landforms.data().iter().filter_map(|&v| LandformClass::from_value(v)) {
        *counts.entry(class).or_insert(0) += 1;
    }
    counts
}
