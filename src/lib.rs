//! Potential-field navigation for a point robot
//!
//! This library plans collision-avoiding routes across a 2D occupancy grid:
//! an exact distance transform drives a repulsive potential around obstacles,
//! a quadratic bowl pulls toward the goal, and steepest descent over the
//! resulting gradient produces the route.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod core;
pub mod navigation;
pub mod scenario;

// Re-export commonly used items for easier access
pub use crate::core::{CircleObstacle, GridFrame, OccupancyGrid};
pub use navigation::{
    FieldParams, Formation, NavigationError, PlanStatus, PlannerParams, PotentialFieldPlanner,
    Route, VectorField,
};
pub use scenario::Scenario;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Navigation parameters for a planning call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Potential field gains and scales
    pub field: FieldParams,
    /// Descent bounds
    pub planner: PlannerParams,
}

impl NavConfig {
    /// Check every parameter before any field is built
    pub fn validate(&self) -> Result<(), NavigationError> {
        self.field.validate()?;
        self.planner.validate()
    }

    /// Load and validate parameters from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let config: NavConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        log::info!("Loaded navigation config from {}", path.as_ref().display());
        Ok(config)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Config read error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid YAML for the expected structure
    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Values parsed but are out of range
    #[error("Config invalid: {0}")]
    Invalid(#[from] NavigationError),
}
