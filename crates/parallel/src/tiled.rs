//! Tiled processing for large rasters
//!
//! The raster is cut into square cores. Each core is processed inside a
//! window grown by a halo of context cells on every side (clipped at the
//! raster edges); only the core of each result is stitched back. With a
//! halo at least as wide as the widest neighborhood an algorithm reads,
//! the stitched output equals a whole-raster run.

use crate::strategy::{ParallelStrategy, ProcessingMode};
use geoform_core::raster::Raster;
use geoform_core::{Error, Result};
use ndarray::{s, Array2};

/// One tile: a core region plus the halo window it is computed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// First row of the core in the source raster
    pub row_offset: usize,
    /// First column of the core in the source raster
    pub col_offset: usize,
    /// Core size
    pub rows: usize,
    pub cols: usize,
    /// First row of the halo window in the source raster
    pub window_row: usize,
    /// First column of the halo window in the source raster
    pub window_col: usize,
    /// Halo window size
    pub window_rows: usize,
    pub window_cols: usize,
}

impl Tile {
    /// Core position inside the halo window
    pub fn core_in_window(&self) -> (usize, usize) {
        (self.row_offset - self.window_row, self.col_offset - self.window_col)
    }
}

/// Iterator over tiles covering a raster, row by row
pub struct TileIterator {
    total_rows: usize,
    total_cols: usize,
    tile_size: usize,
    halo: usize,
    current_row: usize,
    current_col: usize,
}

impl TileIterator {
    pub fn new(total_rows: usize, total_cols: usize, tile_size: usize, halo: usize) -> Self {
        Self {
            total_rows,
            total_cols,
            tile_size: tile_size.max(1),
            halo,
            current_row: 0,
            current_col: 0,
        }
    }
}

impl Iterator for TileIterator {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.total_rows || self.total_cols == 0 {
            return None;
        }

        let rows = self.tile_size.min(self.total_rows - self.current_row);
        let cols = self.tile_size.min(self.total_cols - self.current_col);

        let window_row = self.current_row.saturating_sub(self.halo);
        let window_col = self.current_col.saturating_sub(self.halo);
        let window_row_end = (self.current_row + rows + self.halo).min(self.total_rows);
        let window_col_end = (self.current_col + cols + self.halo).min(self.total_cols);

        let tile = Tile {
            row_offset: self.current_row,
            col_offset: self.current_col,
            rows,
            cols,
            window_row,
            window_col,
            window_rows: window_row_end - window_row,
            window_cols: window_col_end - window_col,
        };

        self.current_col += cols;
        if self.current_col >= self.total_cols {
            self.current_col = 0;
            self.current_row += rows;
        }

        Some(tile)
    }
}

/// Processor for tiled raster operations
#[derive(Debug, Clone, Copy)]
pub struct TiledProcessor {
    tile_size: usize,
    halo: usize,
    mode: ProcessingMode,
}

impl TiledProcessor {
    /// Square cores of `tile_size` cells, `halo` cells of context
    pub fn new(tile_size: usize, halo: usize) -> Self {
        Self {
            tile_size,
            halo,
            mode: ProcessingMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn halo(&self) -> usize {
        self.halo
    }

    /// Tiles covering a raster of the given shape
    pub fn tiles(&self, rows: usize, cols: usize) -> Vec<Tile> {
        TileIterator::new(rows, cols, self.tile_size, self.halo).collect()
    }

    /// Run `f` on every halo window and stitch the cores into one raster.
    ///
    /// `f` must return a raster with the shape of the window it was given.
    pub fn process_with_halo<F>(&self, input: &Raster<f64>, f: F) -> Result<Raster<f64>>
    where
        F: Fn(&Raster<f64>) -> Result<Raster<f64>> + Sync + Send,
    {
        let mut outputs = self.process_many_with_halo(input, |window| Ok(vec![f(window)?]))?;
        outputs
            .pop()
            .ok_or_else(|| Error::Other("tile function produced no raster".into()))
    }

    /// [`process_with_halo`](Self::process_with_halo) for functions that
    /// produce several aligned rasters per window; every call must return
    /// the same number of rasters.
    pub fn process_many_with_halo<F>(&self, input: &Raster<f64>, f: F) -> Result<Vec<Raster<f64>>>
    where
        F: Fn(&Raster<f64>) -> Result<Vec<Raster<f64>>> + Sync + Send,
    {
        if self.tile_size == 0 {
            return Err(Error::invalid_parameter("tile_size", self.tile_size, "must be at least 1"));
        }

        let (rows, cols) = input.shape();
        let tiles = self.tiles(rows, cols);
        tracing::debug!(
            "processing {}x{} raster as {} tiles ({} cells, halo {})",
            cols,
            rows,
            tiles.len(),
            self.tile_size,
            self.halo
        );

        let results: Vec<(Tile, Vec<Raster<f64>>)> = self.mode.par_map(0..tiles.len(), |i| {
            let tile = tiles[i];
            let window = input.window(tile.window_row, tile.window_col, tile.window_rows, tile.window_cols)?;
            let outputs = f(&window)?;
            for out in &outputs {
                window.ensure_same_shape(out)?;
            }
            Ok((tile, outputs))
        })?;

        let count = results.first().map_or(0, |(_, outputs)| outputs.len());
        let mut stitched: Vec<Array2<f64>> = (0..count).map(|_| Array2::from_elem((rows, cols), f64::NAN)).collect();

        for (tile, outputs) in results {
            if outputs.len() != count {
                return Err(Error::Other(format!(
                    "tile function returned {} rasters, expected {}",
                    outputs.len(),
                    count
                )));
            }
            let (r0, c0) = tile.core_in_window();
            for (target, out) in stitched.iter_mut().zip(outputs.iter()) {
                let core = out.data().slice(s![r0..r0 + tile.rows, c0..c0 + tile.cols]);
                target
                    .slice_mut(s![
                        tile.row_offset..tile.row_offset + tile.rows,
                        tile.col_offset..tile.col_offset + tile.cols
                    ])
                    .assign(&core);
            }
        }

        Ok(stitched
            .into_iter()
            .map(|data| {
                let mut output = input.with_same_meta::<f64>(rows, cols);
                output.set_nodata(Some(f64::NAN));
                *output.data_mut() = data;
                output
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoform_algorithms::statistics::neighborhood_mean;
    use geoform_algorithms::terrain::{landform_pipeline, slope, MultiscaleTpiParams, PipelineParams, SlopeParams};
    use geoform_core::GeoTransform;

    fn hills(rows: usize, cols: usize) -> Raster<f64> {
        let mut dem = Raster::new(rows, cols);
        dem.set_transform(GeoTransform::new(0.0, rows as f64 * 30.0, 30.0, -30.0));
        for row in 0..rows {
            for col in 0..cols {
                let z = 800.0
                    + row as f64 * 1.5
                    + 60.0 * (row as f64 / 7.0).sin() * (col as f64 / 5.0).cos();
                dem.set(row, col, z).unwrap();
            }
        }
        dem
    }

    fn same(a: &Raster<f64>, b: &Raster<f64>) -> bool {
        a.shape() == b.shape()
            && a.data()
                .iter()
                .zip(b.data().iter())
                .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
    }

    #[test]
    fn test_tiles_partition_raster() {
        let (rows, cols) = (45, 70);
        let mut covered = vec![vec![0u8; cols]; rows];

        for tile in TileIterator::new(rows, cols, 16, 3) {
            assert!(tile.window_row + tile.window_rows <= rows);
            assert!(tile.window_col + tile.window_cols <= cols);
            for r in tile.row_offset..tile.row_offset + tile.rows {
                for c in tile.col_offset..tile.col_offset + tile.cols {
                    covered[r][c] += 1;
                }
            }
        }

        assert!(covered.iter().flatten().all(|&n| n == 1));
    }

    #[test]
    fn test_halo_clipped_at_edges() {
        let tiles: Vec<_> = TileIterator::new(20, 20, 10, 4).collect();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0].window_row, 0);
        assert_eq!(tiles[0].window_rows, 14);
        assert_eq!(tiles[3].window_row, 6);
        assert_eq!(tiles[3].core_in_window(), (4, 4));
    }

    #[test]
    fn test_tiled_slope_matches_whole() {
        let dem = hills(50, 37);
        let whole = slope(&dem, SlopeParams::default()).unwrap();
        let tiled = TiledProcessor::new(12, 1)
            .process_with_halo(&dem, |t| slope(t, SlopeParams::default()))
            .unwrap();
        assert!(same(&whole, &tiled));
        assert_eq!(tiled.transform(), dem.transform());
    }

    #[test]
    fn test_tiled_focal_mean_matches_whole() {
        let dem = hills(40, 40);
        let whole = neighborhood_mean(&dem, 5).unwrap();
        let tiled = TiledProcessor::new(9, 5)
            .with_mode(ProcessingMode::Sequential)
            .process_with_halo(&dem, |t| neighborhood_mean(t, 5))
            .unwrap();
        assert!(same(&whole, &tiled));
    }

    #[test]
    fn test_tiled_pipeline_matches_whole() {
        let dem = hills(60, 45);
        let params = PipelineParams {
            multiscale: MultiscaleTpiParams { radii: [1, 3, 9] },
            fine_radius: 2,
            ..Default::default()
        };

        let whole = landform_pipeline(&dem, params).unwrap();
        let tiled = TiledProcessor::new(16, params.halo())
            .with_mode(ProcessingMode::ParallelWith(2))
            .process_many_with_halo(&dem, |t| {
                let p = landform_pipeline(t, params)?;
                Ok(vec![p.mean_tpi, p.landforms])
            })
            .unwrap();

        assert!(same(&whole.mean_tpi, &tiled[0]));
        assert!(same(&whole.landforms, &tiled[1]));
    }

    #[test]
    fn test_wrong_output_shape_rejected() {
        let dem = hills(20, 20);
        let result = TiledProcessor::new(8, 1).process_with_halo(&dem, |_| Ok(Raster::new(2, 2)));
        assert!(result.is_err());
        assert!(TiledProcessor::new(0, 1).process_with_halo(&dem, |t| Ok(t.clone())).is_err());
    }
}
