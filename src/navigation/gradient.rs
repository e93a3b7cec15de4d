// navigation/gradient.rs
// Discrete gradient of the negated potential: central differences inside the
// grid, one-sided differences on the border, so every vector points downhill.

use nalgebra::{DMatrix, Vector2};

use super::planner::GradientSampler;

/// Per-cell downhill direction, split into x (column) and y (row) components
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    gx: DMatrix<f64>,
    gy: DMatrix<f64>,
}

impl VectorField {
    /// Gradient of `-potential`.
    ///
    /// An axis of length one has no neighbour to difference against; its
    /// component is zero.
    pub fn from_potential(potential: &DMatrix<f64>) -> Self {
        let (rows, cols) = potential.shape();
        let gx = DMatrix::from_fn(rows, cols, |row, col| {
            -difference(cols, col, |c| potential[(row, c)])
        });
        let gy = DMatrix::from_fn(rows, cols, |row, col| {
            -difference(rows, row, |r| potential[(r, col)])
        });
        VectorField { gx, gy }
    }

    /// x (column) component
    pub fn gx(&self) -> &DMatrix<f64> {
        &self.gx
    }

    /// y (row) component
    pub fn gy(&self) -> &DMatrix<f64> {
        &self.gy
    }

    /// Vector at `(row, col)`, or `None` outside the field
    pub fn get(&self, row: usize, col: usize) -> Option<Vector2<f64>> {
        let (rows, cols) = self.gx.shape();
        (row < rows && col < cols).then(|| Vector2::new(self.gx[(row, col)], self.gy[(row, col)]))
    }
}

impl GradientSampler for VectorField {
    fn shape(&self) -> (usize, usize) {
        self.gx.shape()
    }

    fn sample(&self, row: usize, col: usize) -> Vector2<f64> {
        Vector2::new(self.gx[(row, col)], self.gy[(row, col)])
    }
}

// Finite difference of `value` at index `i` along an axis of length `len`
fn difference(len: usize, i: usize, value: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if i == 0 {
        value(1) - value(0)
    } else if i == len - 1 {
        value(i) - value(i - 1)
    } else {
        (value(i + 1) - value(i - 1)) / 2.0
    }
}
