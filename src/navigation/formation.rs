// navigation/formation.rs
// Formation keeping by rigid offset: followers replay the leader's route
// shifted by a fixed displacement. No replanning happens for followers.

use nalgebra::{Point2, Vector2};

/// Fixed follower displacements relative to a leader route
#[derive(Debug, Clone, PartialEq)]
pub struct Formation {
    offsets: Vec<Vector2<f64>>,
}

impl Formation {
    /// Formation with explicit follower offsets
    pub fn new(offsets: Vec<Vector2<f64>>) -> Self {
        Formation { offsets }
    }

    /// Three followers on an equilateral triangle of circumradius `radius`
    /// around the leader, the first one straight ahead along +x.
    pub fn triangle(radius: f64) -> Self {
        let half_side = radius * 3f64.sqrt() / 2.0;
        Formation::new(vec![
            Vector2::new(radius, 0.0),
            Vector2::new(-radius / 2.0, half_side),
            Vector2::new(-radius / 2.0, -half_side),
        ])
    }

    /// Follower offsets
    pub fn offsets(&self) -> &[Vector2<f64>] {
        &self.offsets
    }

    /// One shifted copy of `route` per follower, in offset order
    pub fn follower_routes(&self, route: &[Point2<f64>]) -> Vec<Vec<Point2<f64>>> {
        self.offsets
            .iter()
            .map(|offset| route.iter().map(|p| p + offset).collect())
            .collect()
    }
}
