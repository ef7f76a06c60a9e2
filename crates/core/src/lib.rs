//! # Geoform Core
//!
//! Core types and I/O for the geoform landform toolkit.
//!
//! This crate provides:
//! - `Raster<T>`: generic georeferenced grid
//! - `GeoTransform` and `CRS`: georeferencing metadata
//! - `Neighborhood`: square kernels used by the focal statistics
//! - `RasterEngine`: the load / clip / reduce-resolution capability
//! - Native GeoTIFF reading and writing

pub mod crs;
pub mod engine;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::CRS;
pub use engine::{Bounds, NativeEngine, RasterEngine, RasterSource};
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::engine::{Bounds, NativeEngine, RasterEngine, RasterSource};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Common shape for every terrain stage.
///
/// Stages are pure: they borrow nothing mutable and return freshly
/// allocated rasters aligned with their input.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
