// core/mod.rs

//! Grid-side building blocks shared by the navigation layer: the occupancy
//! grid and its obstacle rasterization, the physical <-> grid frame, and the
//! distance transform feeding the repulsive potential.

/// Exact Euclidean distance transform
pub mod distance;
/// Physical <-> grid coordinate frame
pub mod localization;
/// Occupancy grid and obstacle rasterization
pub mod perception;

pub use distance::distance_transform;
pub use localization::GridFrame;
pub use perception::{CircleObstacle, OccupancyGrid};
