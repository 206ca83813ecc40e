//! Georeferencing for north-up grids anchored at their lower-left corner

use serde::{Deserialize, Serialize};

/// Placement of a north-up grid with square cells.
///
/// ASCII grids describe their position by the lower-left corner of the
/// lower-left cell, so that is what is stored; nothing is derived and
/// re-derived on the way through a read/write cycle.
///
/// Row 0 is the northernmost row:
/// ```text
/// x = x_ll + col * cell_size
/// y = y_ll + (rows - row) * cell_size
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the lower-left corner
    pub x_ll: f64,
    /// Y coordinate of the lower-left corner
    pub y_ll: f64,
    /// Cell edge length
    pub cell_size: f64,
}

impl GeoTransform {
    pub fn new(x_ll: f64, y_ll: f64, cell_size: f64) -> Self {
        Self {
            x_ll,
            y_ll,
            cell_size,
        }
    }

    /// Geographic coordinates of the centre of cell (row, col) in a grid
    /// with `rows` rows
    pub fn pixel_to_geo(&self, col: usize, row: usize, rows: usize) -> (f64, f64) {
        let x = self.x_ll + (col as f64 + 0.5) * self.cell_size;
        let y = self.y_ll + (rows as f64 - row as f64 - 0.5) * self.cell_size;
        (x, y)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) for a grid of given dimensions
    pub fn bounds(&self, cols: usize, rows: usize) -> (f64, f64, f64, f64) {
        (
            self.x_ll,
            self.y_ll,
            self.x_ll + cols as f64 * self.cell_size,
            self.y_ll + rows as f64 * self.cell_size,
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
