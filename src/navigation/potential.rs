// navigation/potential.rs
// Composes the scalar potential the planner descends: a quadratic bowl around
// the goal plus a finite-support repulsive term driven by obstacle distance.

use log::debug;
use nalgebra::{DMatrix, Point2};
use serde::{Deserialize, Serialize};

use super::NavigationError;

/// Gains and scales of the potential field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Repulsive gain `nu`
    pub repulsive_gain: f64,
    /// Attractive gain `xi`
    pub attractive_gain: f64,
    /// Obstacle influence radius `d0`, in rescaled distance units
    pub influence_radius: f64,
    /// Grid cells per distance unit used to rescale obstacle distances
    pub cells_per_unit: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        FieldParams {
            repulsive_gain: 800.0,
            attractive_gain: 1.0 / 700.0,
            influence_radius: 2.0,
            cells_per_unit: 100.0,
        }
    }
}

impl FieldParams {
    /// Rejects gains and scales that would make the field undefined
    pub fn validate(&self) -> Result<(), NavigationError> {
        if !(self.influence_radius.is_finite() && self.influence_radius > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "influence radius must be positive, got {}",
                self.influence_radius
            )));
        }
        if !(self.cells_per_unit.is_finite() && self.cells_per_unit > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "cells per unit must be positive, got {}",
                self.cells_per_unit
            )));
        }
        for (name, gain) in [
            ("repulsive gain", self.repulsive_gain),
            ("attractive gain", self.attractive_gain),
        ] {
            if !(gain.is_finite() && gain >= 0.0) {
                return Err(NavigationError::InvalidParameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, gain
                )));
            }
        }
        Ok(())
    }

    /// Repulsive potential at raw obstacle distance `distance` (cells).
    /// Zero beyond the influence radius, including infinite distance.
    pub fn repulsive(&self, distance: f64) -> f64 {
        let rescaled = distance / self.cells_per_unit + 1.0;
        if rescaled > self.influence_radius {
            return 0.0;
        }
        let excess = 1.0 / rescaled - 1.0 / self.influence_radius;
        self.repulsive_gain * excess * excess
    }

    /// Attractive potential at grid point `(x, y)` for a goal in grid coordinates
    pub fn attractive(&self, x: f64, y: f64, goal: &Point2<f64>) -> f64 {
        let dx = x - goal.x;
        let dy = y - goal.y;
        self.attractive_gain * (dx * dx + dy * dy)
    }
}

/// Combined potential `attractive + repulsive` over the grid of `distances`.
///
/// `distances` is the obstacle distance transform, indexed `(row, col)`; the
/// goal is `(x = col, y = row)`.
pub fn compose(
    distances: &DMatrix<f64>,
    goal: &Point2<f64>,
    params: &FieldParams,
) -> Result<DMatrix<f64>, NavigationError> {
    params.validate()?;

    let field = DMatrix::from_fn(distances.nrows(), distances.ncols(), |row, col| {
        params.attractive(col as f64, row as f64, goal) + params.repulsive(distances[(row, col)])
    });

    let (low, high) = field
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    debug!(
        "Composed {}x{} potential, goal at ({:.1}, {:.1}), range [{:.3}, {:.3}]",
        field.nrows(),
        field.ncols(),
        goal.x,
        goal.y,
        low,
        high
    );
    Ok(field)
}
