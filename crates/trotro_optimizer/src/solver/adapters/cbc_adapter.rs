use std::sync::Arc;

use coin_cbc::{Col, Model, Sense, raw::Status};
use tracing::debug;

use crate::{
    formulation::{
        bus_formulation::BusFormulation,
        constraint_family::PermissionEncoding,
        linear_constraint::{Comparison, LinearConstraint},
        objective_weights::ObjectiveWeights,
    },
    problem::problem_specification::ProblemSpecification,
    solver::{
        engine::Engine,
        engine_params::EngineParams,
        optimization_result::OptimizationResult,
        result_normalizer::{RawSolution, has_incumbent},
        solver_adapter::{AdapterState, SolverAdapter, SolverAdapterType, solve_native},
        solver_error::SolverError,
        solver_status::SolverStatus,
    },
};

const PERMISSION_ENCODING: PermissionEncoding = PermissionEncoding::UpperBoundRow;

pub struct CbcModel {
    model: Model,
    columns: Vec<Col>,
}

/// COIN-OR CBC. Every (vehicle, route) pair gets an explicit `y <= 0|1` row.
pub struct CbcAdapter {
    formulation: BusFormulation,
    state: AdapterState<CbcModel>,
}

impl CbcAdapter {
    pub fn new(problem: Arc<ProblemSpecification>, weights: ObjectiveWeights) -> Self {
        CbcAdapter {
            formulation: BusFormulation::new(problem, weights),
            state: AdapterState::default(),
        }
    }

    pub(crate) fn create(
        problem: Arc<ProblemSpecification>,
        weights: ObjectiveWeights,
    ) -> Result<SolverAdapterType, SolverError> {
        Ok(SolverAdapterType::Cbc(CbcAdapter::new(problem, weights)))
    }

    fn build(formulation: &BusFormulation) -> CbcModel {
        let mut model = Model::default();
        model.set_obj_sense(Sense::Maximize);

        let columns = formulation
            .layout()
            .variables()
            .map(|variable| {
                let column = model.add_binary();
                model.set_obj_coeff(column, formulation.objective_coefficient(variable));
                column
            })
            .collect::<Vec<_>>();

        for constraint in formulation.constraints(PERMISSION_ENCODING) {
            add_row(&mut model, &columns, &constraint);
        }

        CbcModel { model, columns }
    }

    fn run(formulation: &BusFormulation, model: &mut CbcModel, params: &EngineParams) -> RawSolution {
        model
            .model
            .set_parameter("log", if params.verbose { "1" } else { "0" });
        if let Some(time_limit) = params.time_limit {
            model
                .model
                .set_parameter("sec", &time_limit.as_secs_f64().to_string());
        }
        // CBC accepts any key silently; an unknown one only shows in its own log
        for (key, value) in &params.options {
            debug!(option = %key, %value, "Forwarding option to CBC");
            model.model.set_parameter(key, &value.to_string());
        }

        let solution = model.model.solve();
        let columns = model
            .columns
            .iter()
            .map(|&column| solution.col(column))
            .collect::<Vec<_>>();

        let raw = solution.raw();
        let status = map_status(CbcOutcome {
            proven_optimal: raw.is_proven_optimal(),
            proven_infeasible: raw.is_proven_infeasible(),
            unbounded: raw.is_continuous_unbounded(),
            seconds_limit_reached: raw.is_seconds_limit_reached(),
            status: raw.status(),
            incumbent: has_incumbent(formulation, &columns),
        });

        RawSolution {
            status,
            objective_value: Some(raw.obj_value()),
            columns,
        }
    }
}

/// The flags CBC exposes after a solve.
struct CbcOutcome {
    proven_optimal: bool,
    proven_infeasible: bool,
    unbounded: bool,
    seconds_limit_reached: bool,
    status: Status,
    incumbent: bool,
}

/// A time limit reports `TimeLimit` even when CBC holds an incumbent.
fn map_status(outcome: CbcOutcome) -> SolverStatus {
    if outcome.proven_optimal {
        SolverStatus::Optimal
    } else if outcome.proven_infeasible {
        SolverStatus::Infeasible
    } else if outcome.unbounded {
        SolverStatus::Unbounded
    } else if outcome.seconds_limit_reached {
        SolverStatus::TimeLimit
    } else {
        match outcome.status {
            Status::Stopped | Status::UserEvent => SolverStatus::Interrupted,
            Status::Abandoned => SolverStatus::Abnormal,
            Status::Unlaunched => SolverStatus::NotSolved,
            Status::Finished if outcome.incumbent => SolverStatus::Feasible,
            Status::Finished => SolverStatus::Unknown,
        }
    }
}

fn add_row(model: &mut Model, columns: &[Col], constraint: &LinearConstraint) {
    let row = model.add_row();
    for &(column, coefficient) in &constraint.terms {
        model.set_weight(row, columns[column], coefficient);
    }

    match constraint.comparison {
        Comparison::LessOrEqual => model.set_row_upper(row, constraint.rhs),
        Comparison::GreaterOrEqual => model.set_row_lower(row, constraint.rhs),
        Comparison::Equal => model.set_row_equal(row, constraint.rhs),
    }
}

impl SolverAdapter for CbcAdapter {
    fn solver_name(&self) -> &'static str {
        Engine::Cbc.name()
    }

    fn formulation(&self) -> &BusFormulation {
        &self.formulation
    }

    fn is_built(&self) -> bool {
        self.state.is_built()
    }

    fn build_model(&mut self) {
        let formulation = &self.formulation;
        self.state.ensure_built(|| Self::build(formulation));
    }

    fn solve(&mut self, params: &EngineParams) -> OptimizationResult {
        solve_native(
            Engine::Cbc,
            &self.formulation,
            &mut self.state,
            Self::build,
            Self::run,
            params,
        )
    }

    fn set_weights(&mut self, weights: ObjectiveWeights) {
        debug!(?weights, "Objective weights changed, discarding CBC model");
        self.formulation = self.formulation.with_weights(weights);
        self.state.reset();
    }
}

pub(crate) fn probe() -> Result<(), SolverError> {
    let mut model = Model::default();
    model.set_parameter("log", "0");
    model.set_obj_sense(Sense::Maximize);
    let x = model.add_binary();
    model.set_obj_coeff(x, 1.0);

    let solution = model.solve();
    if !solution.raw().is_proven_optimal() || (solution.col(x) - 1.0).abs() > 1e-6 {
        return Err(SolverError::EngineUnavailable {
            engine: Engine::Cbc,
            reason: format!("probe model returned x = {}", solution.col(x)),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{solver::result_normalizer::normalize, test_utils};

    #[test]
    fn test_probe() {
        assert!(probe().is_ok());
    }

    #[test]
    fn test_solve_toy_instance() {
        let mut adapter = CbcAdapter::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        );

        let result = adapter.solve(&EngineParams::default());

        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert_eq!(result.selected_routes, vec!["R1"]);
        assert_eq!(result.buses_on_route("R1"), vec!["V1", "V2"]);
        assert!((result.objective_value - 95.0).abs() < 1e-6);
    }

    fn outcome(status: Status, seconds_limit_reached: bool) -> CbcOutcome {
        CbcOutcome {
            proven_optimal: false,
            proven_infeasible: false,
            unbounded: false,
            seconds_limit_reached,
            status,
            incumbent: true,
        }
    }

    #[test]
    fn test_time_limit_with_incumbent_reports_no_solution() {
        let formulation = BusFormulation::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        );
        let status = map_status(outcome(Status::Stopped, true));
        assert_eq!(status, SolverStatus::TimeLimit);

        let raw = RawSolution {
            status,
            objective_value: Some(95.0),
            columns: vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
        };
        let result = normalize(&formulation, raw, jiff::SignedDuration::from_secs(3));

        assert_eq!(result, OptimizationResult::empty(SolverStatus::TimeLimit, 3.0));
    }

    #[test]
    fn test_finished_status_mapping() {
        assert_eq!(map_status(outcome(Status::Finished, false)), SolverStatus::Feasible);
        assert_eq!(
            map_status(CbcOutcome {
                incumbent: false,
                ..outcome(Status::Finished, false)
            }),
            SolverStatus::Unknown
        );
        assert_eq!(map_status(outcome(Status::Stopped, false)), SolverStatus::Interrupted);
    }

    #[test]
    fn test_options_are_forwarded() {
        let mut adapter = CbcAdapter::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        );
        let params = EngineParams::default()
            .with_option("ratioGap", crate::solver::engine_params::EngineOption::Float(0.0))
            .with_time_limit(jiff::SignedDuration::from_secs(30));

        let result = adapter.solve(&params);

        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert_eq!(result.selected_routes, vec!["R1"]);
    }

    #[test]
    fn test_forbidden_assignment_row() {
        let problem = Arc::new(test_utils::create_restricted_toy_problem());
        let mut adapter = CbcAdapter::new(problem.clone(), test_utils::toy_weights());

        let result = adapter.solve(&EngineParams::default());

        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert_eq!(result.selected_routes, vec!["R2"]);
        for (vehicle_id, route_id) in &result.vehicle_assignments {
            assert!(problem.is_vehicle_allowed(vehicle_id, route_id));
        }
    }
}
