//! Raster engine capability
//!
//! Everything upstream of the terrain math (where the DEM comes from, how
//! it is cut to a study area, how it is resampled) goes through
//! [`RasterEngine`]. [`NativeEngine`] covers local GeoTIFFs and in-memory
//! grids; other backends can implement the trait.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::io::{read_geotiff, read_geotiff_from_buffer};
use crate::raster::{GeoTransform, Raster};
use ndarray::Array2;
use std::path::PathBuf;

/// Where an elevation grid comes from
#[derive(Debug, Clone)]
pub enum RasterSource {
    /// GeoTIFF on disk
    File(PathBuf),
    /// GeoTIFF already read into memory
    Buffer(Vec<u8>),
    /// Plain grid with explicit metadata
    Array {
        data: Array2<f64>,
        transform: GeoTransform,
        crs: Option<CRS>,
        nodata: Option<f64>,
    },
}

impl RasterSource {
    /// Human-readable name for logs
    pub fn describe(&self) -> String {
        match self {
            RasterSource::File(path) => path.display().to_string(),
            RasterSource::Buffer(buf) => format!("<buffer, {} bytes>", buf.len()),
            RasterSource::Array { data, .. } => {
                format!("<array {}x{}>", data.ncols(), data.nrows())
            }
        }
    }
}

/// Geographic bounding box in the raster's CRS units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x < self.max_x && self.min_y < self.max_y
    }
}

/// Load / clip / downsample capability consumed by the landform pipeline
pub trait RasterEngine {
    /// Load an elevation grid, preserving resolution and georeferencing
    fn load_raster(&self, source: &RasterSource) -> Result<Raster<f64>>;

    /// Restrict a raster to the cells intersecting `bounds`
    fn clip(&self, raster: &Raster<f64>, bounds: Bounds) -> Result<Raster<f64>>;

    /// Downsample by averaging `factor` x `factor` blocks
    fn reduce_resolution(&self, raster: &Raster<f64>, factor: usize) -> Result<Raster<f64>>;
}

/// Engine backed by the native GeoTIFF reader and in-memory grids
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl RasterEngine for NativeEngine {
    fn load_raster(&self, source: &RasterSource) -> Result<Raster<f64>> {
        tracing::debug!("loading raster from {}", source.describe());

        let raster = match source {
            RasterSource::File(path) => read_geotiff(path, None)?,
            RasterSource::Buffer(buf) => read_geotiff_from_buffer(buf, None)?,
            RasterSource::Array {
                data,
                transform,
                crs,
                nodata,
            } => {
                if data.is_empty() {
                    return Err(Error::InvalidDimensions {
                        width: data.ncols(),
                        height: data.nrows(),
                    });
                }
                let mut raster = Raster::from_array(data.clone());
                raster.set_transform(*transform);
                raster.set_crs(crs.clone());
                raster.set_nodata(*nodata);
                raster
            }
        };

        Ok(raster.to_nan_masked())
    }

    fn clip(&self, raster: &Raster<f64>, bounds: Bounds) -> Result<Raster<f64>> {
        if !bounds.is_valid() {
            return Err(Error::invalid_parameter(
                "bounds",
                format!("{:?}", bounds),
                "min must be strictly below max",
            ));
        }

        let gt = raster.transform();
        let corners = [
            gt.geo_to_pixel(bounds.min_x, bounds.min_y),
            gt.geo_to_pixel(bounds.min_x, bounds.max_y),
            gt.geo_to_pixel(bounds.max_x, bounds.min_y),
            gt.geo_to_pixel(bounds.max_x, bounds.max_y),
        ];

        let (rows, cols) = raster.shape();
        let col_lo = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min).floor().max(0.0);
        let col_hi = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max).ceil().min(cols as f64);
        let row_lo = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min).floor().max(0.0);
        let row_hi = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max).ceil().min(rows as f64);

        if !(col_lo < col_hi && row_lo < row_hi) {
            return Err(Error::invalid_parameter(
                "bounds",
                format!("{:?}", bounds),
                "region does not intersect the raster",
            ));
        }

        let (r0, c0) = (row_lo as usize, col_lo as usize);
        raster.window(r0, c0, row_hi as usize - r0, col_hi as usize - c0)
    }

    fn reduce_resolution(&self, raster: &Raster<f64>, factor: usize) -> Result<Raster<f64>> {
        if factor == 0 {
            return Err(Error::invalid_parameter("factor", factor, "must be at least 1"));
        }
        if factor == 1 {
            return Ok(raster.clone());
        }

        let (rows, cols) = raster.shape();
        let out_rows = rows.div_ceil(factor);
        let out_cols = cols.div_ceil(factor);
        let src = raster.data();

        let data = Array2::from_shape_fn((out_rows, out_cols), |(r, c)| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for row in r * factor..((r + 1) * factor).min(rows) {
                for col in c * factor..((c + 1) * factor).min(cols) {
                    let v = src[(row, col)];
                    if !raster.is_nodata(v) {
                        sum += v;
                        count += 1;
                    }
                }
            }
            if count == 0 { f64::NAN } else { sum / count as f64 }
        });

        let mut output = Raster::from_array(data);
        output.set_transform(raster.transform().coarsened(factor));
        output.set_crs(raster.crs().cloned());
        output.set_nodata(Some(f64::NAN));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> Raster<f64> {
        let mut r = Raster::new(rows, cols);
        r.set_transform(GeoTransform::new(0.0, rows as f64 * 10.0, 10.0, -10.0));
        for row in 0..rows {
            for col in 0..cols {
                r.set(row, col, (row * cols + col) as f64).unwrap();
            }
        }
        r
    }

    #[test]
    fn test_load_array_masks_declared_nodata() {
        let data = Array2::from_shape_vec((2, 2), vec![1.0, -9999.0, 3.0, 4.0]).unwrap();
        let source = RasterSource::Array {
            data,
            transform: GeoTransform::new(0.0, 20.0, 10.0, -10.0),
            crs: Some(CRS::from_epsg(32633)),
            nodata: Some(-9999.0),
        };

        let dem = NativeEngine.load_raster(&source).unwrap();
        assert!(dem.get(0, 1).unwrap().is_nan());
        assert_eq!(dem.cell_size(), 10.0);
        assert_eq!(dem.crs().and_then(|c| c.epsg()), Some(32633));
    }

    #[test]
    fn test_clip_to_bounds() {
        let dem = ramp(10, 10);
        // Cells with x in [20, 50) and y in [40, 70) -> cols 2..5, rows 3..6
        let clipped = NativeEngine.clip(&dem, Bounds::new(20.0, 40.0, 50.0, 70.0)).unwrap();

        assert_eq!(clipped.shape(), (3, 3));
        assert_eq!(clipped.get(0, 0).unwrap(), dem.get(3, 2).unwrap());
        assert_eq!(clipped.transform().origin_x, 20.0);
        assert_eq!(clipped.transform().origin_y, 70.0);
    }

    #[test]
    fn test_clip_outside_fails() {
        let dem = ramp(10, 10);
        assert!(NativeEngine.clip(&dem, Bounds::new(500.0, 500.0, 600.0, 600.0)).is_err());
        assert!(NativeEngine.clip(&dem, Bounds::new(50.0, 0.0, 20.0, 10.0)).is_err());
    }

    #[test]
    fn test_reduce_resolution_block_mean() {
        let mut dem = ramp(4, 4);
        dem.set(0, 1, f64::NAN).unwrap();

        let coarse = NativeEngine.reduce_resolution(&dem, 2).unwrap();
        assert_eq!(coarse.shape(), (2, 2));
        // Block {0, NaN, 4, 5} -> mean of valid cells
        assert!((coarse.get(0, 0).unwrap() - 3.0).abs() < 1e-12);
        // Block {10, 11, 14, 15}
        assert!((coarse.get(1, 1).unwrap() - 12.5).abs() < 1e-12);
        assert_eq!(coarse.cell_size(), 20.0);

        assert!(NativeEngine.reduce_resolution(&dem, 0).is_err());
    }
}
