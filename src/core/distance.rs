// core/distance.rs

// Exact Euclidean distance transform of an occupancy grid: every cell gets the
// distance, in cells, to its nearest occupied cell. Separable lower-envelope
// algorithm (Felzenszwalb & Huttenlocher), one 1-D pass down the columns and
// one along the rows, linear in the number of cells.

use log::debug;
use nalgebra::DMatrix;

use super::perception::OccupancyGrid;

/// Distance from each cell to the nearest occupied cell.
///
/// Occupied cells are `0`. With no occupied cell at all every entry is
/// `f64::INFINITY`.
pub fn distance_transform(grid: &OccupancyGrid) -> DMatrix<f64> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut squared = DMatrix::from_fn(rows, cols, |row, col| {
        if grid.is_occupied(row, col) {
            0.0
        } else {
            f64::INFINITY
        }
    });

    let mut envelope = LowerEnvelope::with_capacity(rows.max(cols));
    let mut input = vec![0.0; rows];
    let mut output = vec![0.0; rows];
    for col in 0..cols {
        for row in 0..rows {
            input[row] = squared[(row, col)];
        }
        envelope.transform(&input, &mut output);
        for row in 0..rows {
            squared[(row, col)] = output[row];
        }
    }

    input.resize(cols, 0.0);
    output.resize(cols, 0.0);
    for row in 0..rows {
        for col in 0..cols {
            input[col] = squared[(row, col)];
        }
        envelope.transform(&input, &mut output);
        for col in 0..cols {
            squared[(row, col)] = output[col];
        }
    }

    debug!("Distance transform over {}x{} grid", rows, cols);
    squared.map(f64::sqrt)
}

/// Scratch buffers for the 1-D squared distance transform
struct LowerEnvelope {
    // parabola vertices
    vertices: Vec<usize>,
    // boundaries between consecutive parabolas
    bounds: Vec<f64>,
}

impl LowerEnvelope {
    fn with_capacity(len: usize) -> Self {
        LowerEnvelope {
            vertices: Vec::with_capacity(len),
            bounds: Vec::with_capacity(len + 1),
        }
    }

    /// `output[q] = min_p (q - p)^2 + input[p]`. Infinite samples never enter the envelope.
    fn transform(&mut self, input: &[f64], output: &mut [f64]) {
        self.vertices.clear();
        self.bounds.clear();

        for (q, &fq) in input.iter().enumerate() {
            if !fq.is_finite() {
                continue;
            }
            let qf = q as f64;
            let mut boundary = f64::NEG_INFINITY;
            while let Some(&p) = self.vertices.last() {
                let pf = p as f64;
                let s = ((fq + qf * qf) - (input[p] + pf * pf)) / (2.0 * qf - 2.0 * pf);
                // bounds[k] is the left edge of vertices[k]
                if s <= self.bounds[self.vertices.len() - 1] {
                    self.vertices.pop();
                    self.bounds.pop();
                } else {
                    boundary = s;
                    break;
                }
            }
            self.vertices.push(q);
            self.bounds.push(boundary);
        }

        if self.vertices.is_empty() {
            output.fill(f64::INFINITY);
            return;
        }

        let mut k = 0;
        for (q, out) in output.iter_mut().enumerate() {
            let qf = q as f64;
            while k + 1 < self.vertices.len() && self.bounds[k + 1] < qf {
                k += 1;
            }
            let p = self.vertices[k];
            let offset = qf - p as f64;
            *out = offset * offset + input[p];
        }
    }
}
