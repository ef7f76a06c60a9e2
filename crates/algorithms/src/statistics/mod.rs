//! Neighborhood statistics for raster data
//!
//! - **focal**: square moving-window mean and standard deviation

pub mod focal;

pub use focal::{neighborhood_mean, neighborhood_stats, neighborhood_stddev, NeighborhoodStats};
