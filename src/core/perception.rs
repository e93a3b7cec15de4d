// core/perception.rs

// Holds the binary occupancy grid the planner reads, and rasterizes circular
// obstacles described in physical units onto it. Cells are stored row-major;
// `true` marks a cell occupied by an obstacle.

// Dependencies
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::localization::GridFrame;

/// Circular obstacle in physical units (center and radius share the same unit)
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct CircleObstacle {
    /// Center `[x, y]`
    pub center: [f64; 2],
    /// Radius
    pub radius: f64,
}

/// Binary occupancy grid, `rows x cols`, indexed `(row, col)` = `(y, x)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an obstacle-free grid
    pub fn new(rows: usize, cols: usize) -> Self {
        OccupancyGrid {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Builds a grid from nested rows. Returns `None` when rows differ in length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(OccupancyGrid {
            rows: rows.len(),
            cols,
            cells: rows.concat(),
        })
    }

    /// Rasterizes circles given in physical units onto a fresh grid of the frame's size
    pub fn from_circles(frame: &GridFrame, obstacles: &[CircleObstacle]) -> Self {
        let mut grid = OccupancyGrid::new(frame.rows(), frame.cols());
        for obstacle in obstacles {
            grid.fill_circle(frame, obstacle);
        }
        debug!(
            "Rasterized {} obstacles: {} of {} cells occupied",
            obstacles.len(),
            grid.occupied_count(),
            grid.cells.len()
        );
        grid
    }

    /// Marks every cell strictly inside the circle as occupied
    pub fn fill_circle(&mut self, frame: &GridFrame, obstacle: &CircleObstacle) {
        let center = frame.to_grid(&Point2::new(obstacle.center[0], obstacle.center[1]));
        let radius = obstacle.radius * frame.cells_per_unit();
        if !(radius > 0.0) {
            return;
        }
        let radius_sq = radius * radius;

        // Only scan the circle's bounding box, clipped to the grid
        // Saturating bounds: off-grid centers and huge radii only clip the box
        let reach = (radius.ceil() as i64).saturating_add(1);
        let row_lo = center.y.saturating_sub(reach).max(0);
        let row_hi = center.y.saturating_add(reach).min(self.rows as i64 - 1);
        let col_lo = center.x.saturating_sub(reach).max(0);
        let col_hi = center.x.saturating_add(reach).min(self.cols as i64 - 1);

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let dx = col as f64 - center.x as f64;
                let dy = row as f64 - center.y as f64;
                if dx * dx + dy * dy < radius_sq {
                    self.set(row as usize, col as usize, true);
                }
            }
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

    /// Whether `(row, col)` is occupied. Out-of-range cells read as free.
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Sets the occupancy of `(row, col)`; ignored outside the grid
    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = occupied;
        }
    }

    /// Count of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}
