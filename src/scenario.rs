//! World description loaded from YAML
//!
//! A scenario fixes the grid size and resolution, start and goal poses in
//! physical units, circular obstacles, an optional formation radius and the
//! navigation parameters. It is the input of the demo binary.

use log::info;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::core::{CircleObstacle, GridFrame, OccupancyGrid};
use crate::navigation::{Formation, NavigationError, PotentialFieldPlanner, Route};
use crate::{ConfigError, NavConfig};

/// Planning scenario in physical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Grid cells per physical unit
    pub cells_per_unit: f64,
    /// Start pose `[x, y]`
    pub start: [f64; 2],
    /// Goal pose `[x, y]`
    pub goal: [f64; 2],
    /// Circular obstacles
    #[serde(default)]
    pub obstacles: Vec<CircleObstacle>,
    /// Circumradius of the triangular follower formation, if any
    #[serde(default)]
    pub formation_radius: Option<f64>,
    /// Navigation parameters
    #[serde(default)]
    pub navigation: NavConfig,
}

/// Planned route with its physical-unit waypoints and follower routes
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    /// Route in grid coordinates
    pub route: Route,
    /// Route in physical units
    pub waypoints: Vec<Point2<f64>>,
    /// Follower routes in physical units, empty without a formation
    pub followers: Vec<Vec<Point2<f64>>>,
}

impl Scenario {
    /// Load and validate a scenario from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let scenario: Scenario = serde_yaml::from_reader(file)?;
        scenario.validate()?;
        info!("Loaded scenario from {}", path.as_ref().display());
        Ok(scenario)
    }

    /// Check grid resolution, poses, obstacles, formation radius and
    /// navigation parameters
    pub fn validate(&self) -> Result<(), NavigationError> {
        if !(self.cells_per_unit.is_finite() && self.cells_per_unit > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "scenario cells per unit must be positive, got {}",
                self.cells_per_unit
            )));
        }
        for (role, pose) in [("start", self.start), ("goal", self.goal)] {
            if !pose.iter().all(|v| v.is_finite()) {
                return Err(NavigationError::InvalidParameter(format!(
                    "{} pose must be finite, got {:?}",
                    role, pose
                )));
            }
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            if !(obstacle.center.iter().all(|v| v.is_finite()) && obstacle.radius.is_finite()) {
                return Err(NavigationError::InvalidParameter(format!(
                    "obstacle {} must have a finite center and radius, got {:?}",
                    index, obstacle
                )));
            }
        }
        if let Some(radius) = self.formation_radius {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(NavigationError::InvalidParameter(format!(
                    "formation radius must be non-negative, got {}",
                    radius
                )));
            }
        }
        self.navigation.validate()
    }

    /// Frame mapping the scenario's physical units onto its grid
    pub fn frame(&self) -> GridFrame {
        GridFrame::new(self.rows, self.cols, self.cells_per_unit)
    }

    /// Occupancy grid with all obstacles rasterized
    pub fn occupancy_grid(&self) -> OccupancyGrid {
        OccupancyGrid::from_circles(&self.frame(), &self.obstacles)
    }

    /// Start cell in grid coordinates
    pub fn start_cell(&self) -> Point2<f64> {
        let cell = self.frame().to_grid(&Point2::new(self.start[0], self.start[1]));
        Point2::new(cell.x as f64, cell.y as f64)
    }

    /// Goal cell in grid coordinates
    pub fn goal_cell(&self) -> Point2<f64> {
        let cell = self.frame().to_grid(&Point2::new(self.goal[0], self.goal[1]));
        Point2::new(cell.x as f64, cell.y as f64)
    }

    /// Plan the scenario end to end
    pub fn plan(&self) -> Result<ScenarioPlan, NavigationError> {
        self.validate()?;
        let frame = self.frame();
        let grid = self.occupancy_grid();
        let planner = PotentialFieldPlanner::new(self.navigation)?;
        let route = planner.plan(&grid, self.start_cell(), self.goal_cell())?;

        let waypoints = route.to_world(&frame);
        let followers = self
            .formation_radius
            .map(|radius| Formation::triangle(radius).follower_routes(&waypoints))
            .unwrap_or_default();

        Ok(ScenarioPlan {
            route,
            waypoints,
            followers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SMALL: &str = "
rows: 60
cols: 80
cells_per_unit: 10.0
start: [-3.0, 2.0]
goal: [3.0, -2.0]
formation_radius: 0.5
";

    #[test]
    fn minimal_yaml_uses_default_navigation() {
        let scenario: Scenario = serde_yaml::from_str(SMALL).unwrap();
        assert!(scenario.obstacles.is_empty());
        assert_eq!(scenario.navigation, NavConfig::default());
        assert_eq!(scenario.start_cell(), Point2::new(10.0, 50.0));
        assert_eq!(scenario.goal_cell(), Point2::new(70.0, 10.0));
    }

    #[test]
    fn obstacle_free_scenario_reaches_goal_with_followers() {
        let scenario: Scenario = serde_yaml::from_str(SMALL).unwrap();
        let plan = scenario.plan().unwrap();
        assert!(plan.route.is_reached());
        assert_eq!(plan.waypoints.len(), plan.route.len());
        assert_eq!(plan.followers.len(), 3);
        assert!(plan.followers.iter().all(|f| f.len() == plan.waypoints.len()));
        assert_eq!(plan.waypoints[0], Point2::new(-3.0, 2.0));
    }

    #[test]
    fn negative_formation_radius_is_rejected() {
        let mut scenario: Scenario = serde_yaml::from_str(SMALL).unwrap();
        scenario.formation_radius = Some(-1.0);
        assert!(matches!(
            scenario.plan(),
            Err(NavigationError::InvalidParameter(_))
        ));
    }

    #[rstest]
    #[case([f64::NAN, f64::NAN], [3.0, -2.0])]
    #[case([-3.0, 2.0], [f64::NAN, -2.0])]
    #[case([f64::INFINITY, 2.0], [3.0, -2.0])]
    #[case([-3.0, 2.0], [3.0, f64::NEG_INFINITY])]
    fn non_finite_poses_are_rejected(#[case] start: [f64; 2], #[case] goal: [f64; 2]) {
        let mut scenario: Scenario = serde_yaml::from_str(SMALL).unwrap();
        scenario.start = start;
        scenario.goal = goal;
        assert!(matches!(
            scenario.validate(),
            Err(NavigationError::InvalidParameter(_))
        ));
        assert!(matches!(
            scenario.plan(),
            Err(NavigationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn nan_start_from_yaml_is_rejected() {
        let yaml = SMALL.replace("start: [-3.0, 2.0]", "start: [.nan, .nan]");
        let scenario: Scenario = serde_yaml::from_str(&yaml).unwrap();
        assert!(matches!(
            scenario.plan(),
            Err(NavigationError::InvalidParameter(_))
        ));
    }

    #[rstest]
    #[case("{center: [0.0, 0.0], radius: .inf}")]
    #[case("{center: [0.0, 0.0], radius: .nan}")]
    #[case("{center: [.nan, 1.0], radius: 0.2}")]
    #[case("{center: [-.inf, 0.0], radius: 0.2}")]
    fn non_finite_obstacles_are_rejected(#[case] obstacle: &str) {
        let yaml = format!("{}obstacles: [{}]\n", SMALL, obstacle);
        let scenario: Scenario = serde_yaml::from_str(&yaml).unwrap();
        assert!(matches!(
            scenario.plan(),
            Err(NavigationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn far_away_obstacle_is_ignored() {
        let yaml = format!("{}obstacles: [{{center: [1.0e300, 0.0], radius: 0.2}}]\n", SMALL);
        let scenario: Scenario = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(scenario.occupancy_grid().occupied_count(), 0);
        assert!(scenario.plan().unwrap().route.is_reached());
    }
}
