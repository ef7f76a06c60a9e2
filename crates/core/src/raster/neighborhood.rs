//! Square neighborhood kernels

use crate::error::{Error, Result};
use std::ops::Range;

/// Square window of side `2r + 1` centred on a cell.
///
/// The radius is in cells and always at least 1; construct through
/// [`Neighborhood::square`] so a zero radius is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    radius: usize,
}

impl Neighborhood {
    /// Square neighborhood of the given radius
    pub fn square(radius: usize) -> Result<Self> {
        if radius == 0 {
            return Err(Error::invalid_parameter(
                "radius",
                radius,
                "neighborhood radius must be at least 1 cell",
            ));
        }
        Ok(Self { radius })
    }

    /// 3x3 window used by the terrain derivatives
    pub const fn queen() -> Self {
        Self { radius: 1 }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the window (`2r + 1`)
    pub fn size(&self) -> usize {
        self.radius * 2 + 1
    }

    /// Number of cells in an untruncated window
    pub fn cell_count(&self) -> usize {
        self.size() * self.size()
    }

    /// Row and column ranges of the window around `(row, col)`, truncated
    /// to a raster of `rows` x `cols`.
    pub fn window(&self, row: usize, col: usize, rows: usize, cols: usize) -> (Range<usize>, Range<usize>) {
        let r = self.radius;
        (
            row.saturating_sub(r)..(row + r + 1).min(rows),
            col.saturating_sub(r)..(col + r + 1).min(cols),
        )
    }

    /// Whether the untruncated window around `(row, col)` fits inside the raster
    pub fn fits(&self, row: usize, col: usize, rows: usize, cols: usize) -> bool {
        let r = self.radius;
        row >= r && col >= r && row + r < rows && col + r < cols
    }
}
