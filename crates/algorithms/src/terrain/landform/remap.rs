//! Renumbering of landform codes for display and reporting

use super::class::LandformClass;
use crate::maybe_rayon::*;
use geoform_core::raster::Raster;
use geoform_core::Result;
use ndarray::Array2;

/// Dense renumbering: the fifteen codes become 0..=14 in code order.
/// Anything that is not a landform code maps to `NaN`.
pub fn remap_landforms(code: f64) -> f64 {
    LandformClass::from_value(code).map_or(f64::NAN, |c| c.index() as f64)
}

/// Four-group renumbering: 0 peaks, ridges and cliffs; 1 upper slopes;
/// 2 lower slopes; 3 valleys.
pub fn remap_landforms_simple(code: f64) -> f64 {
    LandformClass::from_value(code).map_or(f64::NAN, |c| c.group() as f64)
}

/// [`remap_landforms`] over a raster
pub fn remap_landforms_raster(landforms: &Raster<f64>) -> Result<Raster<f64>> {
    map_cells(landforms, remap_landforms)
}

/// [`remap_landforms_simple`] over a raster
pub fn remap_landforms_simple_raster(landforms: &Raster<f64>) -> Result<Raster<f64>> {
    map_cells(landforms, remap_landforms_simple)
}

fn map_cells(raster: &Raster<f64>, f: fn(f64) -> f64) -> Result<Raster<f64>> {
    let (rows, cols) = raster.shape();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| f(raster.data()[(row, col)]))
                .collect::<Vec<f64>>()
        })
        .collect();

    let mut output = raster.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() = Array2::from_shape_vec((rows, cols), output_data)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_preserves_order() {
        let dense: Vec<f64> = LandformClass::ALL
            .iter()
            .map(|c| remap_landforms(c.code() as f64))
            .collect();
        let expected: Vec<f64> = (0..15).map(|i| i as f64).collect();
        assert_eq!(dense, expected);
        assert!(remap_landforms(16.0).is_nan());
        assert!(remap_landforms(f64::NAN).is_nan());
    }

    #[test]
    fn test_simple_coarsens_groups() {
        let groups: [&[f64]; 4] = [
            &[11.0, 12.0, 13.0, 14.0, 15.0],
            &[21.0, 22.0, 23.0, 24.0],
            &[31.0, 32.0, 33.0, 34.0],
            &[41.0, 42.0],
        ];
        for group in groups {
            let first = remap_landforms_simple(group[0]);
            assert!(group.iter().all(|&c| remap_landforms_simple(c) == first));
        }
        assert_eq!(remap_landforms_simple(15.0), 0.0);
        assert_eq!(remap_landforms_simple(24.0), 1.0);
        assert_eq!(remap_landforms_simple(31.0), 2.0);
        assert_eq!(remap_landforms_simple(42.0), 3.0);
        assert!(remap_landforms_simple(25.0).is_nan());
    }

    #[test]
    fn test_raster_forms() {
        let landforms = Raster::from_vec(vec![11.0, 42.0, f64::NAN, 99.0], 2, 2).unwrap();

        let dense = remap_landforms_raster(&landforms).unwrap();
        assert_eq!(dense.get(0, 0).unwrap(), 0.0);
        assert_eq!(dense.get(0, 1).unwrap(), 14.0);
        assert!(dense.get(1, 0).unwrap().is_nan());
        assert!(dense.get(1, 1).unwrap().is_nan());

        let simple = remap_landforms_simple_raster(&landforms).unwrap();
        assert_eq!(simple.get(0, 1).unwrap(), 3.0);
    }
}
