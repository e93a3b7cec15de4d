//! Potential-field navigation
//!
//! This module turns an occupancy grid and a goal into a scalar potential,
//! differentiates it into a downhill vector field, and descends that field from
//! a start cell to produce a route. Every call builds its fields from scratch;
//! nothing is shared between planning calls.

/// Rigid formation offsets
pub mod formation;
/// Downhill vector field
pub mod gradient;
/// Steepest-descent route planner
pub mod planner;
/// Attractive and repulsive potential
pub mod potential;

pub use formation::Formation;
pub use gradient::VectorField;
pub use planner::{descend, GradientSampler, PlanStatus, PlannerParams, Route};
pub use potential::{compose, FieldParams};

use log::debug;
use nalgebra::{DMatrix, Point2};
use thiserror::Error;

use crate::core::{distance_transform, OccupancyGrid};
use crate::NavConfig;

/// Navigation error types
#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    /// A gain, radius or scale is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The grid is too small to difference
    #[error("Invalid grid: {rows}x{cols}, need at least 2x2")]
    InvalidGrid {
        /// Grid rows
        rows: usize,
        /// Grid columns
        cols: usize,
    },
    /// Start or goal does not fall on a grid cell
    #[error("The {role} ({x:.2}, {y:.2}) lies outside the grid")]
    OutsideGrid {
        /// `"start"` or `"goal"`
        role: &'static str,
        /// Grid x (column)
        x: f64,
        /// Grid y (row)
        y: f64,
    },
    /// The sampled gradient had zero (or non-finite) length
    #[error("Degenerate gradient at cell ({row}, {col}) on iteration {iteration}")]
    DegenerateGradient {
        /// Iteration that sampled the cell
        iteration: usize,
        /// Cell row
        row: usize,
        /// Cell column
        col: usize,
    },
    /// The route stepped off the grid
    #[error("Route left the grid at ({x:.2}, {y:.2}) on iteration {iteration}")]
    LeftGrid {
        /// Iteration that tried to sample outside
        iteration: usize,
        /// Grid x (column)
        x: f64,
        /// Grid y (row)
        y: f64,
    },
}

/// Fields built for one planning query
#[derive(Debug, Clone)]
pub struct PotentialField {
    /// Distance from each cell to the nearest obstacle, in cells
    pub distances: DMatrix<f64>,
    /// Combined attractive and repulsive potential
    pub potential: DMatrix<f64>,
    /// Downhill direction per cell
    pub gradient: VectorField,
}

/// Grid-to-route pipeline: distance transform, potential, gradient, descent
#[derive(Debug, Clone)]
pub struct PotentialFieldPlanner {
    config: NavConfig,
}

impl PotentialFieldPlanner {
    /// Create a planner, rejecting invalid parameters up front
    pub fn new(config: NavConfig) -> Result<Self, NavigationError> {
        config.validate()?;
        Ok(PotentialFieldPlanner { config })
    }

    /// Parameters in use
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Build the distance, potential and gradient fields for `goal` (grid coordinates)
    pub fn build_field(
        &self,
        grid: &OccupancyGrid,
        goal: Point2<f64>,
    ) -> Result<PotentialField, NavigationError> {
        if grid.rows() < 2 || grid.cols() < 2 {
            return Err(NavigationError::InvalidGrid {
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }

        let distances = distance_transform(grid);
        let potential = compose(&distances, &goal, &self.config.field)?;
        let gradient = VectorField::from_potential(&potential);
        debug!(
            "Built potential field over {}x{} grid ({} occupied cells)",
            grid.rows(),
            grid.cols(),
            grid.occupied_count()
        );

        Ok(PotentialField {
            distances,
            potential,
            gradient,
        })
    }

    /// Plan a route from `start` to `goal`, both in grid coordinates `(x = col, y = row)`
    pub fn plan(
        &self,
        grid: &OccupancyGrid,
        start: Point2<f64>,
        goal: Point2<f64>,
    ) -> Result<Route, NavigationError> {
        planner::check_endpoints(&start, &goal, (grid.rows(), grid.cols()))?;
        let field = self.build_field(grid, goal)?;
        descend(&field.gradient, start, goal, &self.config.planner)
    }
}
