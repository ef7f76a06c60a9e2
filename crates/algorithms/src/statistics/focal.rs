//! Focal (moving window) statistics
//!
//! Mean and population standard deviation over a square window of side
//! `2r + 1`. Windows are truncated at the raster edges and masked cells
//! inside a window are skipped, so every valid cell gets a value. A masked
//! centre stays masked.
//!
//! Samples are summed as offsets from the centre value and the deviation
//! takes a second pass, so a flat window has exactly zero standard
//! deviation at any radius and elevation.

use crate::maybe_rayon::*;
use geoform_core::raster::{Neighborhood, Raster};
use geoform_core::Result;
use ndarray::Array2;

/// Mean and standard deviation rasters from a single pass over the DEM
#[derive(Debug, Clone)]
pub struct NeighborhoodStats {
    pub mean: Raster<f64>,
    pub stddev: Raster<f64>,
}

/// Mean of the valid cells in the square window around each cell
pub fn neighborhood_mean(raster: &Raster<f64>, radius: usize) -> Result<Raster<f64>> {
    let window = Neighborhood::square(radius)?;
    let (rows, cols) = raster.shape();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                if raster.is_nodata(raster.data()[(row, col)]) {
                    continue;
                }
                if let Some((mean, _)) = window_moments(raster, &window, row, col, false) {
                    *out = mean;
                }
            }

            row_data
        })
        .collect();

    build_output(raster, output_data)
}

/// Population standard deviation of the valid cells in the square window
pub fn neighborhood_stddev(raster: &Raster<f64>, radius: usize) -> Result<Raster<f64>> {
    Ok(neighborhood_stats(raster, radius)?.stddev)
}

/// Mean and population standard deviation in one sweep
pub fn neighborhood_stats(raster: &Raster<f64>, radius: usize) -> Result<NeighborhoodStats> {
    let window = Neighborhood::square(radius)?;
    let (rows, cols) = raster.shape();

    let pairs: Vec<(f64, f64)> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![(f64::NAN, f64::NAN); cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                if raster.is_nodata(raster.data()[(row, col)]) {
                    continue;
                }
                if let Some(moments) = window_moments(raster, &window, row, col, true) {
                    *out = moments;
                }
            }

            row_data
        })
        .collect();

    let (means, stddevs): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

    Ok(NeighborhoodStats {
        mean: build_output(raster, means)?,
        stddev: build_output(raster, stddevs)?,
    })
}

/// `(mean, stddev)` of the valid cells around `(row, col)`; the standard
/// deviation is only computed when `with_stddev` is set.
fn window_moments(
    raster: &Raster<f64>,
    window: &Neighborhood,
    row: usize,
    col: usize,
    with_stddev: bool,
) -> Option<(f64, f64)> {
    let (rows, cols) = raster.shape();
    let (row_range, col_range) = window.window(row, col, rows, cols);
    let data = raster.data();

    // centre is valid; callers skip masked centres
    let reference = data[(row, col)];

    let mut sum = 0.0;
    let mut count = 0usize;
    for r in row_range.clone() {
        for c in col_range.clone() {
            let v = data[(r, c)];
            if !raster.is_nodata(v) {
                sum += v - reference;
                count += 1;
            }
        }
    }

    if count == 0 {
        return None;
    }
    let offset = sum / count as f64;
    let mean = reference + offset;

    if !with_stddev {
        return Some((mean, f64::NAN));
    }

    let mut sq = 0.0;
    for r in row_range {
        for c in col_range.clone() {
            let v = data[(r, c)];
            if !raster.is_nodata(v) {
                let d = (v - reference) - offset;
                sq += d * d;
            }
        }
    }

    Some((mean, (sq / count as f64).sqrt()))
}

fn build_output(raster: &Raster<f64>, data: Vec<f64>) -> Result<Raster<f64>> {
    let (rows, cols) = raster.shape();
    let mut output = raster.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() = Array2::from_shape_vec((rows, cols), data)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geoform_core::GeoTransform;

    fn grid(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Raster<f64> {
        let mut r = Raster::new(rows, cols);
        r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        for row in 0..rows {
            for col in 0..cols {
                r.set(row, col, f(row, col)).unwrap();
            }
        }
        r
    }

    #[test]
    fn test_mean_interior_and_edge() {
        let dem = grid(5, 5, |r, c| (r * 5 + c) as f64);
        let mean = neighborhood_mean(&dem, 1).unwrap();

        // Interior 3x3 around (2, 2) is symmetric around 12
        assert_relative_eq!(mean.get(2, 2).unwrap(), 12.0, epsilon = 1e-12);
        // Corner window is truncated to {0, 1, 5, 6}
        assert_relative_eq!(mean.get(0, 0).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stddev_flat_is_zero() {
        let dem = grid(9, 9, |_, _| 1234.567_891);
        let stats = neighborhood_stats(&dem, 3).unwrap();

        for row in 0..9 {
            for col in 0..9 {
                assert_eq!(stats.stddev.get(row, col).unwrap(), 0.0);
                assert_eq!(stats.mean.get(row, col).unwrap(), 1234.567_891);
            }
        }
    }

    #[test]
    fn test_stddev_flat_is_zero_at_large_radius() {
        let dem = grid(120, 120, |_, _| 3456.789_123);
        let stats = neighborhood_stats(&dem, 81).unwrap();

        for row in (0..120).step_by(7) {
            for col in 0..120 {
                assert_eq!(stats.stddev.get(row, col).unwrap(), 0.0, "cell ({}, {})", row, col);
                assert_eq!(stats.mean.get(row, col).unwrap(), 3456.789_123);
            }
        }
    }

    #[test]
    fn test_stddev_population() {
        // Window {1, 2, 3, 4} at the corner: population std = sqrt(1.25)
        let dem = grid(2, 2, |r, c| (r * 2 + c + 1) as f64);
        let sd = neighborhood_stddev(&dem, 1).unwrap();
        assert_relative_eq!(sd.get(0, 0).unwrap(), 1.25f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_masked_cells_skipped_and_centre_masked() {
        let mut dem = grid(3, 3, |_, _| 10.0);
        dem.set(0, 0, f64::NAN).unwrap();
        dem.set(2, 2, f64::NAN).unwrap();

        let stats = neighborhood_stats(&dem, 1).unwrap();
        assert_relative_eq!(stats.mean.get(1, 1).unwrap(), 10.0, epsilon = 1e-12);
        assert_eq!(stats.stddev.get(1, 1).unwrap(), 0.0);
        assert!(stats.mean.get(2, 2).unwrap().is_nan());
        assert!(stats.stddev.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_declared_nodata_skipped() {
        let mut dem = grid(3, 3, |_, _| 5.0);
        dem.set_nodata(Some(-9999.0));
        dem.set(0, 1, -9999.0).unwrap();

        let mean = neighborhood_mean(&dem, 1).unwrap();
        assert_relative_eq!(mean.get(1, 1).unwrap(), 5.0, epsilon = 1e-12);
        assert!(mean.get(0, 1).unwrap().is_nan());
    }

    #[test]
    fn test_zero_radius_rejected() {
        let dem = grid(3, 3, |_, _| 1.0);
        assert!(neighborhood_mean(&dem, 0).is_err());
        assert!(neighborhood_stats(&dem, 0).is_err());
    }
}
