// src/main.rs
// Plans a route for the scenario given on the command line (default
// config/scenario.yaml) and writes it, in physical units, to stdout as YAML.

use log::{error, info};
use nalgebra::Point2;
use potential_nav::{PlanStatus, Scenario};
use serde::Serialize;
use std::error::Error;

/// Point in physical units as written to the report
#[derive(Serialize)]
struct Waypoint {
    x: f64,
    y: f64,
}

impl From<&Point2<f64>> for Waypoint {
    fn from(p: &Point2<f64>) -> Self {
        Waypoint { x: p.x, y: p.y }
    }
}

#[derive(Serialize)]
struct Report {
    reached: bool,
    iterations: usize,
    distance_to_goal: Option<f64>,
    route: Vec<Waypoint>,
    followers: Vec<Vec<Waypoint>>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/scenario.yaml".to_string());
    let scenario = Scenario::from_yaml_file(&path)?;
    info!(
        "Planning on a {}x{} grid with {} obstacles",
        scenario.rows,
        scenario.cols,
        scenario.obstacles.len()
    );

    let plan = match scenario.plan() {
        Ok(plan) => plan,
        Err(e) => {
            error!("Planning failed: {}", e);
            return Err(e.into());
        }
    };

    let distance_to_goal = match plan.route.status() {
        PlanStatus::Reached => None,
        PlanStatus::Exhausted { distance_to_goal } => Some(distance_to_goal),
    };
    info!(
        "Route has {} points after {} iterations",
        plan.route.len(),
        plan.route.iterations()
    );

    let report = Report {
        reached: plan.route.is_reached(),
        iterations: plan.route.iterations(),
        distance_to_goal,
        route: plan.waypoints.iter().map(Waypoint::from).collect(),
        followers: plan
            .followers
            .iter()
            .map(|follower| follower.iter().map(Waypoint::from).collect())
            .collect(),
    };
    serde_yaml::to_writer(std::io::stdout().lock(), &report)?;
    Ok(())
}
