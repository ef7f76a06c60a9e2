//! Terrain analysis algorithms
//!
//! Stages of the landform classification, each a pure function over
//! `Raster<f64>`:
//! - Slope and aspect: Horn (1981) 3x3 derivatives
//! - HLI: heat load index from slope and aspect
//! - TPI: raw, standardized and multi-scale topographic position
//! - Landform: bucket / composite / table classification
//! - Pipeline: all of the above in one call

mod aspect;
mod hli;
mod horn;
mod landform;
mod pipeline;
mod slope;
mod tpi;

pub use aspect::{aspect, Aspect, AspectOutput};
pub use hli::{heat_load_index, hli, Hli, HliParams};
pub use landform::{
    classify_landforms, classify_landforms_with, composite_signature, hli_bucket, landform_for_composite,
    landform_histogram, mean_tpi_bucket, remap_landforms, remap_landforms_raster, remap_landforms_simple,
    remap_landforms_simple_raster, slope_bucket, tpi_bucket, LandformClass, LandformThresholds,
};
pub use pipeline::{landform_pipeline, Landform, LandformProducts, PipelineParams};
pub use slope::{slope, Slope, SlopeParams, SlopeUnits};
pub use tpi::{
    mean_tpi, multiscale_tpi, radius_for_distance, standardized_tpi, topographic_position, tpi,
    MultiscaleTpi, MultiscaleTpiParams, Tpi, STDDEV_EPSILON,
};
