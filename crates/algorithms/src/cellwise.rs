//! Per-cell combination of aligned rasters

use crate::maybe_rayon::*;
use geoform_core::raster::Raster;
use geoform_core::{Error, Result};
use ndarray::Array2;

/// Combine `N` pixel-aligned rasters cell by cell.
///
/// A cell that is no-data in any input is `NaN` in the output and `f` is
/// not called for it. The output takes its georeferencing from the first
/// input.
pub(crate) fn combine<const N: usize, F>(inputs: [&Raster<f64>; N], f: F) -> Result<Raster<f64>>
where
    F: Fn([f64; N]) -> f64 + Sync + Send,
{
    let first = *inputs
        .first()
        .ok_or_else(|| Error::Other("combine needs at least one raster".into()))?;
    for other in inputs.iter().skip(1) {
        first.ensure_same_shape(*other)?;
    }

    let (rows, cols) = first.shape();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                let values: [f64; N] = std::array::from_fn(|i| inputs[i].data()[(row, col)]);
                if values.iter().zip(inputs.iter()).any(|(v, r)| r.is_nodata(*v)) {
                    continue;
                }
                *out = f(values);
            }

            row_data
        })
        .collect();

    let mut output = first.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() = Array2::from_shape_vec((rows, cols), output_data)?;

    Ok(output)
}
