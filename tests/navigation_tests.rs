use nalgebra::Point2;
use potential_nav::navigation::planner::nearest_cell;
use potential_nav::{
    CircleObstacle, NavConfig, NavigationError, OccupancyGrid, PlanStatus, PlannerParams,
    PotentialFieldPlanner, Scenario,
};
use rstest::rstest;

fn reference_scenario() -> Scenario {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/scenario.yaml");
    Scenario::from_yaml_file(path).unwrap()
}

fn planner_with(max_iterations: usize, convergence_radius: f64) -> PotentialFieldPlanner {
    let config = NavConfig {
        planner: PlannerParams {
            max_iterations,
            convergence_radius,
        },
        ..NavConfig::default()
    };
    PotentialFieldPlanner::new(config).unwrap()
}

fn ring(rows: usize, cols: usize, center: (f64, f64), inner: f64, outer: f64) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            let dx = col as f64 - center.0;
            let dy = row as f64 - center.1;
            let r2 = dx * dx + dy * dy;
            if r2 >= inner * inner && r2 <= outer * outer {
                grid.set(row, col, true);
            }
        }
    }
    grid
}

#[test]
fn reference_scenario_reaches_goal_without_collisions() {
    let scenario = reference_scenario();
    assert_eq!(scenario.navigation, NavConfig::default());
    let grid = scenario.occupancy_grid();
    let plan = scenario.plan().unwrap();

    assert_eq!(plan.route.status(), PlanStatus::Reached);
    assert!(plan.route.iterations() < 1000);
    assert_eq!(plan.route.points()[0], Point2::new(100.0, 300.0));

    let goal = scenario.goal_cell();
    let end = plan.route.end();
    assert!((end.x - goal.x).abs() + (end.y - goal.y).abs() < 5.0);

    for point in plan.route.points() {
        let (row, col) = nearest_cell(point, (grid.rows(), grid.cols())).unwrap();
        assert!(!grid.is_occupied(row, col), "route crosses obstacle at {:?}", point);
    }

    // physical units, first point is the start pose
    let first = plan.waypoints[0];
    assert!((first.x + 1.5).abs() < 1e-12 && (first.y - 0.5).abs() < 1e-12);
    assert_eq!(plan.followers.len(), 3);
}

#[test]
fn obstacle_on_the_start_goal_segment_stalls_the_descent() {
    // single obstacle centered on the midpoint of start and goal
    let mut scenario = reference_scenario();
    scenario.obstacles = vec![CircleObstacle { center: [0.0, -0.25], radius: 0.2 }];
    let grid = scenario.occupancy_grid();
    let plan = scenario.plan().unwrap();

    assert!(!plan.route.is_reached());
    assert_eq!(plan.route.iterations(), 1000);
    assert_eq!(plan.route.len(), 1001);
    match plan.route.status() {
        PlanStatus::Exhausted { distance_to_goal } => assert!(distance_to_goal >= 5.0),
        PlanStatus::Reached => unreachable!(),
    }
    for point in plan.route.points() {
        let (row, col) = nearest_cell(point, (grid.rows(), grid.cols())).unwrap();
        assert!(!grid.is_occupied(row, col), "route crosses obstacle at {:?}", point);
    }
}

#[test]
fn identical_inputs_give_identical_routes() {
    let scenario = reference_scenario();
    let first = scenario.plan().unwrap().route;
    let second = scenario.plan().unwrap().route;
    assert_eq!(first.len(), second.len());
    for (a, b) in first.points().iter().zip(second.points()) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }
}

#[test]
fn obstacle_free_descent_never_moves_away_from_goal() {
    let grid = OccupancyGrid::new(120, 120);
    let goal = Point2::new(100.0, 15.0);
    let route = planner_with(1000, 5.0)
        .plan(&grid, Point2::new(10.0, 100.0), goal)
        .unwrap();

    assert!(route.is_reached());
    let distances: Vec<f64> = route.points().iter().map(|p| (p - goal).norm()).collect();
    for pair in distances.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9, "{} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn enclosed_start_exhausts_exactly_the_iteration_budget() {
    let grid = ring(200, 200, (60.0, 100.0), 30.0, 34.0);
    let planner = planner_with(500, 5.0);
    let route = planner
        .plan(&grid, Point2::new(60.0, 100.0), Point2::new(170.0, 100.0))
        .unwrap();

    assert_eq!(route.iterations(), 500);
    assert_eq!(route.len(), 501);
    match route.status() {
        PlanStatus::Exhausted { distance_to_goal } => assert!(distance_to_goal > 100.0),
        PlanStatus::Reached => panic!("escaped the ring"),
    }
    for p in route.points() {
        let r = ((p.x - 60.0).powi(2) + (p.y - 100.0).powi(2)).sqrt();
        assert!(r < 30.0, "left the enclosure at {:?}", p);
    }
}

#[rstest]
#[case(1)]
#[case(17)]
#[case(250)]
fn route_never_exceeds_iteration_bound(#[case] max_iterations: usize) {
    let grid = ring(200, 200, (60.0, 100.0), 30.0, 34.0);
    let route = planner_with(max_iterations, 5.0)
        .plan(&grid, Point2::new(55.0, 95.0), Point2::new(170.0, 100.0))
        .unwrap();
    assert!(route.len() <= max_iterations + 1);
}

#[test]
fn start_equal_to_goal_is_a_single_point() {
    let scenario = reference_scenario();
    let grid = scenario.occupancy_grid();
    let goal = scenario.goal_cell();
    let route = PotentialFieldPlanner::new(scenario.navigation)
        .unwrap()
        .plan(&grid, goal, goal)
        .unwrap();
    assert_eq!(route.points(), &[goal]);
    assert_eq!(route.status(), PlanStatus::Reached);
    assert_eq!(route.iterations(), 0);
}

#[test]
fn flat_gradient_at_the_goal_cell_is_reported() {
    // the bowl is flat exactly at its minimum
    let grid = OccupancyGrid::new(40, 40);
    let result = planner_with(100, 0.1).plan(&grid, Point2::new(20.4, 20.0), Point2::new(20.0, 20.0));
    assert_eq!(
        result.unwrap_err(),
        NavigationError::DegenerateGradient {
            iteration: 0,
            row: 20,
            col: 20
        }
    );
}

#[test]
fn repulsion_off_the_grid_edge_is_reported() {
    let mut grid = OccupancyGrid::new(20, 20);
    for row in 0..20 {
        grid.set(row, 5, true);
    }
    let result = planner_with(100, 5.0).plan(&grid, Point2::new(2.0, 10.0), Point2::new(18.0, 10.0));
    match result {
        Err(NavigationError::LeftGrid { iteration, x, y }) => {
            assert_eq!(iteration, 3);
            assert_eq!((x, y), (-1.0, 10.0));
        }
        other => panic!("expected LeftGrid, got {:?}", other),
    }
}

#[rstest]
#[case(1, 5)]
#[case(5, 1)]
#[case(0, 0)]
fn degenerate_grids_are_rejected(#[case] rows: usize, #[case] cols: usize) {
    let grid = OccupancyGrid::new(rows, cols);
    let result = planner_with(10, 5.0).build_field(&grid, Point2::new(0.0, 0.0));
    assert!(matches!(result, Err(NavigationError::InvalidGrid { .. })));
}

#[test]
fn goal_outside_the_grid_is_rejected_before_planning() {
    let grid = OccupancyGrid::new(30, 30);
    let result = planner_with(10, 5.0).plan(&grid, Point2::new(3.0, 3.0), Point2::new(31.0, 3.0));
    assert!(matches!(
        result,
        Err(NavigationError::OutsideGrid { role: "goal", .. })
    ));
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let mut config = NavConfig::default();
    config.field.influence_radius = 0.0;
    assert!(matches!(
        PotentialFieldPlanner::new(config),
        Err(NavigationError::InvalidParameter(_))
    ));
}
