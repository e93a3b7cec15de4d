// core/localization.rs

// Maps poses between physical units and grid cells. The grid center sits at
// physical (0, 0); x grows with the column index and y with the row index.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Affine transform between physical coordinates and grid coordinates
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GridFrame {
    rows: usize,
    cols: usize,
    cells_per_unit: f64,
}

impl GridFrame {
    /// Creates a frame for a `rows x cols` grid at `cells_per_unit` resolution
    pub fn new(rows: usize, cols: usize, cells_per_unit: f64) -> Self {
        GridFrame {
            rows,
            cols,
            cells_per_unit,
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid cells per physical unit (100 for a centimeter grid in meters)
    pub fn cells_per_unit(&self) -> f64 {
        self.cells_per_unit
    }

    /// Grid coordinate of the physical origin, `(cols / 2, rows / 2)`
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.cols as f64 / 2.0, self.rows as f64 / 2.0)
    }

    /// Physical point to the nearest grid cell `(x = col, y = row)`
    pub fn to_grid(&self, pose: &Point2<f64>) -> Point2<i64> {
        let cell = pose.coords * self.cells_per_unit + self.center();
        Point2::new(cell.x.round() as i64, cell.y.round() as i64)
    }

    /// Grid coordinates back to physical units
    pub fn to_world(&self, cell: &Point2<f64>) -> Point2<f64> {
        Point2::from((cell.coords - self.center()) / self.cells_per_unit)
    }
}
