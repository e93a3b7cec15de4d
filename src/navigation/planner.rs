// navigation/planner.rs
// Steepest-descent route planning over a gradient field.

// Starting at `start`, the planner repeatedly samples the field at the nearest
// cell and advances one grid unit along the sampled direction, until it comes
// within the convergence radius of the goal or runs out of iterations.

use log::{debug, info, warn};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::NavigationError;
use crate::core::GridFrame;

/// Source of downhill vectors the planner steps along
#[cfg_attr(test, mockall::automock)]
pub trait GradientSampler {
    /// `(rows, cols)` of the sampled field
    fn shape(&self) -> (usize, usize);

    /// Vector at an in-range cell `(row, col)`
    fn sample(&self, row: usize, col: usize) -> Vector2<f64>;
}

/// Iteration bound and stopping distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    /// Maximum number of descent steps
    pub max_iterations: usize,
    /// The goal counts as reached below this Manhattan distance (grid units)
    pub convergence_radius: f64,
}

impl Default for PlannerParams {
    fn default() -> Self {
        PlannerParams {
            max_iterations: 1000,
            convergence_radius: 5.0,
        }
    }
}

impl PlannerParams {
    /// Rejects a convergence radius the planner could never satisfy
    pub fn validate(&self) -> Result<(), NavigationError> {
        if !(self.convergence_radius.is_finite() && self.convergence_radius > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "convergence radius must be positive, got {}",
                self.convergence_radius
            )));
        }
        Ok(())
    }
}

/// Terminal state of a planning call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanStatus {
    /// Within the convergence radius of the goal
    Reached,
    /// Iteration bound hit first
    Exhausted {
        /// Manhattan distance to the goal measured at the last route point,
        /// after the final step
        distance_to_goal: f64,
    },
}

/// Planned route in grid coordinates `(x = col, y = row)`
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Point2<f64>>,
    status: PlanStatus,
    iterations: usize,
}

impl Route {
    /// All points, first is the start
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// How planning ended
    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// Whether the goal was reached
    pub fn is_reached(&self) -> bool {
        self.status == PlanStatus::Reached
    }

    /// Descent steps taken
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a route holds at least its start
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last point reached
    pub fn end(&self) -> Point2<f64> {
        // never empty: construction always pushes the start
        self.points[self.points.len() - 1]
    }

    /// Route converted to physical units
    pub fn to_world(&self, frame: &GridFrame) -> Vec<Point2<f64>> {
        self.points.iter().map(|p| frame.to_world(p)).collect()
    }
}

/// Manhattan distance in grid units
pub fn manhattan(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Nearest `(row, col)` of `point`, ties to even, or `None` outside a `shape` field
pub fn nearest_cell(point: &Point2<f64>, shape: (usize, usize)) -> Option<(usize, usize)> {
    let row = point.y.round_ties_even();
    let col = point.x.round_ties_even();
    let inside = |index: f64, len: usize| index.is_finite() && index >= 0.0 && index < len as f64;
    (inside(row, shape.0) && inside(col, shape.1)).then(|| (row as usize, col as usize))
}

/// Rejects a start or goal that does not round onto a cell of a `shape` field
pub(crate) fn check_endpoints(
    start: &Point2<f64>,
    goal: &Point2<f64>,
    shape: (usize, usize),
) -> Result<(), NavigationError> {
    for (role, point) in [("start", start), ("goal", goal)] {
        if nearest_cell(point, shape).is_none() {
            return Err(NavigationError::OutsideGrid {
                role,
                x: point.x,
                y: point.y,
            });
        }
    }
    Ok(())
}

/// Descends `field` from `start` toward `goal`.
///
/// Each step moves exactly one grid unit along the sampled direction, so a
/// route holds at most `max_iterations + 1` points. Running out of iterations
/// is reported through [`PlanStatus::Exhausted`], not as an error.
pub fn descend<S>(
    field: &S,
    start: Point2<f64>,
    goal: Point2<f64>,
    params: &PlannerParams,
) -> Result<Route, NavigationError>
where
    S: GradientSampler + ?Sized,
{
    params.validate()?;
    let shape = field.shape();
    check_endpoints(&start, &goal, shape)?;

    let mut points = Vec::with_capacity(params.max_iterations.min(4096) + 1);
    points.push(start);
    let mut current = start;

    for iteration in 0..params.max_iterations {
        if manhattan(&current, &goal) < params.convergence_radius {
            info!("Reached the goal after {} iterations", iteration);
            return Ok(Route {
                points,
                status: PlanStatus::Reached,
                iterations: iteration,
            });
        }

        let (row, col) = nearest_cell(&current, shape).ok_or(NavigationError::LeftGrid {
            iteration,
            x: current.x,
            y: current.y,
        })?;
        let direction = field.sample(row, col);
        let norm = direction.norm();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(NavigationError::DegenerateGradient {
                iteration,
                row,
                col,
            });
        }

        current += direction / norm;
        points.push(current);
    }

    let distance_to_goal = manhattan(&current, &goal);
    warn!(
        "Goal not reached after {} iterations, distance to goal {:.2}",
        params.max_iterations, distance_to_goal
    );
    debug!("Stopped at ({:.2}, {:.2})", current.x, current.y);
    Ok(Route {
        points,
        status: PlanStatus::Exhausted { distance_to_goal },
        iterations: params.max_iterations,
    })
}
