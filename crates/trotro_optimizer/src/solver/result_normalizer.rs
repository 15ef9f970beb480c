use jiff::SignedDuration;
use tracing::{debug, warn};

use crate::formulation::{bus_formulation::BusFormulation, variable::Variable};

use super::{optimization_result::OptimizationResult, solver_status::SolverStatus};

const BINARY_THRESHOLD: f64 = 0.5;

/// What an adapter reads back from its engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: SolverStatus,
    /// Engine-reported objective, when the engine exposes one.
    pub objective_value: Option<f64>,
    /// One value per formulation column. Empty when the engine has none.
    pub columns: Vec<f64>,
}

impl RawSolution {
    pub fn without_solution(status: SolverStatus) -> Self {
        RawSolution {
            status,
            objective_value: None,
            columns: Vec::new(),
        }
    }
}

/// Snaps relaxation residues to 0 or 1.
pub fn round_columns(columns: &[f64]) -> Vec<f64> {
    columns
        .iter()
        .map(|&value| if value > BINARY_THRESHOLD { 1.0 } else { 0.0 })
        .collect()
}

/// Whether the engine's columns round to an assignment satisfying every row.
pub fn has_incumbent(formulation: &BusFormulation, columns: &[f64]) -> bool {
    !columns.is_empty() && formulation.is_feasible(&round_columns(columns))
}

/// Builds the normalized result. Revenue and travel time are recomputed from
/// the nominal demand of the selected routes, never taken from the engine.
pub fn normalize(
    formulation: &BusFormulation,
    raw: RawSolution,
    solve_time: SignedDuration,
) -> OptimizationResult {
    let solve_time = solve_time.as_secs_f64();

    if !raw.status.is_success() {
        return OptimizationResult::empty(raw.status, solve_time);
    }

    if raw.columns.len() != formulation.num_columns() {
        warn!(
            status = %raw.status,
            expected = formulation.num_columns(),
            received = raw.columns.len(),
            "Engine reported success without a full assignment"
        );
        return OptimizationResult::empty(SolverStatus::Abnormal, solve_time);
    }

    let problem = formulation.problem();
    let layout = formulation.layout();
    let columns = round_columns(&raw.columns);

    let mut result = OptimizationResult::empty(raw.status, solve_time);
    for variable in layout.variables() {
        if columns[layout.column(variable)] < 1.0 {
            continue;
        }
        debug!(column = %formulation.variable_name(variable), "Column set");

        match variable {
            Variable::Route(route) => {
                let route = problem.route(route);
                result.selected_routes.push(route.route_id().to_owned());
                result.total_revenue += route.daily_revenue();
                result.total_travel_time += route.daily_travel_time();
            }
            Variable::Assignment { vehicle, route } => {
                let vehicle_id = problem.vehicle(vehicle).external_id();
                let route_id = problem.route(route).route_id();
                if let Some(previous) = result
                    .vehicle_assignments
                    .insert(vehicle_id.to_owned(), route_id.to_owned())
                {
                    warn!(
                        vehicle_id,
                        previous = %previous,
                        route_id,
                        "Vehicle assigned to more than one route"
                    );
                }
            }
        }
    }

    for violated in formulation.violated_constraints(&columns) {
        warn!(
            family = %violated.family,
            constraint = %violated,
            activity = violated.activity(&columns),
            "Rounded solution violates a constraint"
        );
    }

    result.objective_value = raw
        .objective_value
        .unwrap_or_else(|| formulation.objective_value(&columns));

    result
}
