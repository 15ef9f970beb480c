#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use fxhash::FxHashMap;
use trotro_optimizer::{
    problem::problem_specification::ProblemSpecification,
    solver::optimization_result::OptimizationResult,
};

pub fn data_fixture_path(fixture: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../data/fixtures/")
        .join(fixture)
        .canonicalize()
        .unwrap()
}

pub fn load_fixture(fixture: &str) -> Arc<ProblemSpecification> {
    Arc::new(ProblemSpecification::from_json_file(data_fixture_path(fixture)).unwrap())
}

/// Checks the eight constraint families directly on a normalized result.
pub fn assert_respects_constraints(problem: &ProblemSpecification, result: &OptimizationResult) {
    let general = problem.general();

    assert!(
        result.vehicle_assignments.len() <= general.total_fleet_size as usize,
        "fleet size exceeded"
    );

    let mut buses_per_route: FxHashMap<&str, u32> = FxHashMap::default();
    for (vehicle_id, route_id) in &result.vehicle_assignments {
        assert!(
            problem.is_vehicle_allowed(vehicle_id, route_id),
            "{vehicle_id} is not allowed on {route_id}"
        );
        assert!(
            result.selected_routes.contains(route_id),
            "{vehicle_id} assigned to unselected route {route_id}"
        );
        *buses_per_route.entry(route_id.as_str()).or_default() += 1;
    }

    for route_id in &result.selected_routes {
        let route = problem.route_by_id(route_id).unwrap();
        let buses = buses_per_route.get(route_id.as_str()).copied().unwrap_or(0);

        assert!(route.distance_km() <= general.max_route_length_km);
        assert!(
            route.daily_revenue() >= f64::from(buses) * general.min_daily_sales_per_bus_ghs - 1e-6,
            "{route_id} sells too little for {buses} buses"
        );
        assert!(
            route.demand_per_day() <= buses * general.bus_capacity_passengers,
            "{route_id} demand exceeds capacity of {buses} buses"
        );
    }

    for capacity in problem.terminal_capacities() {
        let terminal = problem.terminal_idx(&capacity.terminal_id).unwrap();
        let buses: u32 = problem
            .routes_from_terminal(terminal)
            .map(|(_, route)| {
                buses_per_route
                    .get(route.route_id())
                    .copied()
                    .unwrap_or(0)
            })
            .sum();

        assert!(
            buses <= capacity.max_buses,
            "terminal {} holds {buses} buses",
            capacity.terminal_id
        );
    }
}
