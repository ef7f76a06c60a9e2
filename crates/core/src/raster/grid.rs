//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement};
use ndarray::{s, Array2};

/// A georeferenced 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in row-major order together with
/// its geotransform, CRS and optional no-data value. Derived rasters are
/// created with [`Raster::with_same_meta`] so they stay pixel-aligned with
/// the elevation raster they come from.
///
/// # Example
///
/// ```ignore
/// use geoform_core::Raster;
///
/// let mut dem: Raster<f64> = Raster::new(100, 100);
/// dem.set(10, 20, 1520.0)?;
/// let z = dem.get(10, 20)?;
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
    crs: Option<CRS>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        Ok(Self::from_array(Array2::from_shape_vec((rows, cols), data)?))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Zero-filled raster of another type sharing this raster's georeferencing
    pub fn with_same_meta<U: RasterElement>(&self, rows: usize, cols: usize) -> Raster<U> {
        Raster {
            data: Array2::zeros((rows, cols)),
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        }
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with [`Error::SizeMismatch`] unless `other` has the same shape
    pub fn ensure_same_shape<U: RasterElement>(&self, other: &Raster<U>) -> Result<()> {
        let (er, ec) = self.shape();
        let (ar, ac) = other.shape();
        if (er, ec) != (ar, ac) {
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }
        Ok(())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Value of the cell containing geographic point `(x, y)`.
    ///
    /// `None` when the point falls outside the raster.
    pub fn get_geo(&self, x: f64, y: f64) -> Option<T> {
        let (col, row) = self.transform.geo_to_pixel(x, y);
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        self.data.get((row.floor() as usize, col.floor() as usize)).copied()
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        let cell = self.data.get_mut((row, col)).ok_or(Error::IndexOutOfBounds {
            row,
            col,
            rows,
            cols,
        })?;
        *cell = value;
        Ok(())
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Copy a rectangular window into a new raster with an adjusted transform
    pub fn window(&self, row_offset: usize, col_offset: usize, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || row_offset + rows > self.rows() || col_offset + cols > self.cols() {
            return Err(Error::IndexOutOfBounds {
                row: row_offset + rows,
                col: col_offset + cols,
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let data = self
            .data
            .slice(s![row_offset..row_offset + rows, col_offset..col_offset + cols])
            .to_owned();

        Ok(Self {
            data,
            transform: self.transform.window(row_offset, col_offset),
            crs: self.crs.clone(),
            nodata: self.nodata,
        })
    }

    // Metadata

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        self.transform.geo_to_pixel(x, y)
    }

    // Value checks

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Check if cell at (row, col) contains no-data
    pub fn is_nodata_at(&self, row: usize, col: usize) -> Result<bool> {
        let value = self.get(row, col)?;
        Ok(self.is_nodata(value))
    }

    /// Basic statistics over valid cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.data.iter().filter(|v| !self.is_nodata(**v)) {
            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }
            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        RasterStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

impl Raster<f64> {
    /// Copy of this raster with every declared no-data value replaced by `NaN`.
    ///
    /// All algorithms work on `NaN`-masked `f64` grids; loading a DEM with
    /// e.g. `-9999` as no-data goes through here first.
    pub fn to_nan_masked(&self) -> Raster<f64> {
        let mut out = self.clone();
        if let Some(nd) = self.nodata {
            out.data.mapv_inplace(|v| if v == nd { f64::NAN } else { v });
        }
        out.nodata = Some(f64::NAN);
        out
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f64> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<f64> = Raster::new(10, 10);
        raster.set(5, 5, 42.0).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42.0);
        assert!(raster.get(10, 0).is_err());
        assert!(raster.set(0, 10, 1.0).is_err());
    }

    #[test]
    fn test_get_geo() {
        let mut raster: Raster<f64> = Raster::new(4, 4);
        raster.set_transform(GeoTransform::new(1000.0, 2000.0, 30.0, -30.0));
        raster.set(1, 2, 7.0).unwrap();

        // Centre of cell (row 1, col 2)
        assert_eq!(raster.get_geo(1075.0, 1955.0), Some(7.0));
        assert_eq!(raster.get_geo(990.0, 1955.0), None);
        assert_eq!(raster.get_geo(1075.0, 1000.0), None);
    }

    #[test]
    fn test_window_keeps_georeferencing() {
        let mut raster: Raster<f64> = Raster::new(6, 6);
        raster.set_transform(GeoTransform::new(0.0, 60.0, 10.0, -10.0));
        raster.set_crs(Some(CRS::from_epsg(32633)));
        raster.set(3, 4, 9.0).unwrap();

        let w = raster.window(2, 2, 3, 3).unwrap();
        assert_eq!(w.shape(), (3, 3));
        assert_eq!(w.get(1, 2).unwrap(), 9.0);
        assert_eq!(w.transform().origin_x, 20.0);
        assert_eq!(w.transform().origin_y, 40.0);
        assert_eq!(w.crs().and_then(|c| c.epsg()), Some(32633));
        assert!(raster.window(4, 4, 3, 3).is_err());
    }

    #[test]
    fn test_to_nan_masked() {
        let mut raster = Raster::from_vec(vec![1.0, -9999.0, 3.0, 4.0], 2, 2).unwrap();
        raster.set_nodata(Some(-9999.0));

        let masked = raster.to_nan_masked();
        assert!(masked.get(0, 1).unwrap().is_nan());
        assert_eq!(masked.get(1, 1).unwrap(), 4.0);
    }

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<f64> = Raster::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                raster.set(i, j, (i * 10 + j) as f64).unwrap();
            }
        }
        raster.set(0, 0, f64::NAN).unwrap();

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(99.0));
        assert_eq!(stats.valid_count, 99);
        assert_eq!(stats.nodata_count, 1);
    }
}
