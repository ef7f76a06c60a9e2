//! # Geoform Algorithms
//!
//! Terrain analysis for landform classification.
//!
//! ## Stages
//!
//! - **terrain**: slope, aspect, heat load index, topographic position
//!   (raw, standardized, multi-scale mean) and the landform classifier
//! - **statistics**: square-window neighborhood mean and standard deviation
//!
//! [`terrain::landform_pipeline`] runs every stage on a DEM and returns all
//! intermediate rasters.

mod cellwise;
mod maybe_rayon;
pub mod statistics;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::statistics::{
        neighborhood_mean, neighborhood_stats, neighborhood_stddev, NeighborhoodStats,
    };
    pub use crate::terrain::{
        aspect, classify_landforms, hli, landform_pipeline, mean_tpi, multiscale_tpi, remap_landforms,
        remap_landforms_simple, slope, standardized_tpi, topographic_position, tpi, AspectOutput,
        HliParams, LandformClass, LandformProducts, LandformThresholds, MultiscaleTpiParams,
        PipelineParams, SlopeParams, SlopeUnits,
    };
    pub use geoform_core::prelude::*;
}
