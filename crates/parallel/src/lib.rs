//! # Geoform Parallel
//!
//! Execution strategies for geoform rasters.
//!
//! This crate provides:
//! - Tiled processing with a halo of context cells, so neighborhood
//!   algorithms give the same result per tile as on the whole raster
//! - Sequential / parallel / fixed-thread-count processing modes

#[cfg(feature = "parallel")]
pub mod strategy;
#[cfg(feature = "parallel")]
pub mod tiled;

#[cfg(feature = "parallel")]
pub use strategy::{num_cpus, set_num_threads, ParallelStrategy, ProcessingMode};
#[cfg(feature = "parallel")]
pub use tiled::{Tile, TileIterator, TiledProcessor};
