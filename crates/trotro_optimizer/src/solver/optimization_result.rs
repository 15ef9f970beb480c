use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::problem::problem_specification::ProblemSpecification;

use super::solver_status::SolverStatus;

/// Normalized outcome of one solve, identical in shape for every engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub objective_value: f64,
    /// Route ids with `x = 1`, in input order.
    pub selected_routes: Vec<String>,
    /// Vehicle id to route id.
    pub vehicle_assignments: BTreeMap<String, String>,
    pub total_revenue: f64,
    pub total_travel_time: f64,
    pub solver_status: SolverStatus,
    /// Wall-clock seconds spent inside the engine.
    pub solve_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteStatistics {
    pub route_id: String,
    pub buses_assigned: usize,
    pub bus_ids: Vec<String>,
    pub distance_km: f64,
    pub time_min: f64,
    pub fare_ghs: f64,
    pub demand_per_day: u32,
    pub daily_revenue: f64,
    pub daily_travel_time: f64,
}

impl OptimizationResult {
    /// The result reported for every non-success status.
    pub fn empty(solver_status: SolverStatus, solve_time: f64) -> Self {
        OptimizationResult {
            objective_value: 0.0,
            selected_routes: Vec::new(),
            vehicle_assignments: BTreeMap::new(),
            total_revenue: 0.0,
            total_travel_time: 0.0,
            solver_status,
            solve_time,
        }
    }

    pub fn is_success(&self) -> bool {
        self.solver_status.is_success()
    }

    pub fn buses_on_route(&self, route_id: &str) -> Vec<&str> {
        self.vehicle_assignments
            .iter()
            .filter(|(_, assigned)| assigned.as_str() == route_id)
            .map(|(vehicle_id, _)| vehicle_id.as_str())
            .collect()
    }

    pub fn num_assigned_vehicles(&self) -> usize {
        self.vehicle_assignments.len()
    }

    /// Facts about every selected route, in selection order. Routes unknown to
    /// `problem` are skipped.
    pub fn route_statistics(&self, problem: &ProblemSpecification) -> Vec<RouteStatistics> {
        self.selected_routes
            .iter()
            .filter_map(|route_id| problem.route_by_id(route_id))
            .map(|route| {
                let bus_ids = self
                    .buses_on_route(route.route_id())
                    .into_iter()
                    .map(str::to_owned)
                    .collect::<Vec<_>>();

                RouteStatistics {
                    route_id: route.route_id().to_owned(),
                    buses_assigned: bus_ids.len(),
                    bus_ids,
                    distance_km: route.distance_km(),
                    time_min: route.time_min(),
                    fare_ghs: route.fare_ghs(),
                    demand_per_day: route.demand_per_day(),
                    daily_revenue: route.daily_revenue(),
                    daily_travel_time: route.daily_travel_time(),
                }
            })
            .collect()
    }
}
