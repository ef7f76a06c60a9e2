//! Horn (1981) 3x3 finite differences shared by slope and aspect
//!
//! ```text
//! a b c
//! d e f
//! g h i
//! ```

use geoform_core::raster::Raster;

/// Unscaled Horn gradient at a cell (divide by `8 * cellsize` for slope)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HornGradient {
    /// `(c + 2f + i) - (a + 2d + g)`: rises eastward when positive
    pub dz_dx: f64,
    /// `(g + 2h + i) - (a + 2b + c)`: rises with row index (southward)
    pub dz_dy: f64,
}

/// Horn gradient at `(row, col)`, or `None` on the outer ring and wherever
/// the centre or any of the eight neighbors is no-data.
pub(crate) fn horn_gradient(dem: &Raster<f64>, row: usize, col: usize) -> Option<HornGradient> {
    let (rows, cols) = dem.shape();
    if row == 0 || col == 0 || row + 1 >= rows || col + 1 >= cols {
        return None;
    }

    let data = dem.data();
    let cell = |dr: usize, dc: usize| data[(row + dr - 1, col + dc - 1)];

    let (a, b, c) = (cell(0, 0), cell(0, 1), cell(0, 2));
    let (d, e, f) = (cell(1, 0), cell(1, 1), cell(1, 2));
    let (g, h, i) = (cell(2, 0), cell(2, 1), cell(2, 2));

    if [a, b, c, d, e, f, g, h, i].iter().any(|v| dem.is_nodata(*v)) {
        return None;
    }

    Some(HornGradient {
        dz_dx: (c + 2.0 * f + i) - (a + 2.0 * d + g),
        dz_dy: (g + 2.0 * h + i) - (a + 2.0 * b + c),
    })
}
