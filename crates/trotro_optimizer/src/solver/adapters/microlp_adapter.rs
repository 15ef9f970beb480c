use std::sync::Arc;

use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};
use tracing::{debug, error, warn};

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
        result_normalizer::RawSolution,
        solver_adapter::{AdapterState, SolverAdapter, SolverAdapterType, solve_native},
        solver_error::SolverError,
        solver_status::SolverStatus,
    },
};

const PERMISSION_ENCODING: PermissionEncoding = PermissionEncoding::VariableBound;

pub struct MicroLpModel {
    problem: Problem,
    variables: Vec<microlp::Variable>,
}

/// Pure Rust engine. Forbidden assignments are integer columns bounded to
/// `[0, 0]`; microlp has no time limit or option surface.
pub struct MicroLpAdapter {
    formulation: BusFormulation,
    state: AdapterState<MicroLpModel>,
}

impl MicroLpAdapter {
    pub fn new(problem: Arc<ProblemSpecification>, weights: ObjectiveWeights) -> Self {
        MicroLpAdapter {
            formulation: BusFormulation::new(problem, weights),
            state: AdapterState::default(),
        }
    }

    pub(crate) fn create(
        problem: Arc<ProblemSpecification>,
        weights: ObjectiveWeights,
    ) -> Result<SolverAdapterType, SolverError> {
        Ok(SolverAdapterType::MicroLp(MicroLpAdapter::new(
            problem, weights,
        )))
    }

    fn build(formulation: &BusFormulation) -> MicroLpModel {
        let mut problem = Problem::new(OptimizationDirection::Maximize);

        let variables = formulation
            .layout()
            .variables()
            .map(|variable| {
                let upper = formulation.column_upper_bound(variable, PERMISSION_ENCODING);
                problem.add_integer_var(
                    formulation.objective_coefficient(variable),
                    (0, upper as i32),
                )
            })
            .collect::<Vec<_>>();

        for constraint in formulation.constraints(PERMISSION_ENCODING) {
            add_constraint(&mut problem, &variables, &constraint);
        }

        MicroLpModel { problem, variables }
    }

    fn run(_: &BusFormulation, model: &mut MicroLpModel, params: &EngineParams) -> RawSolution {
        if let Some(time_limit) = params.time_limit {
            warn!(%time_limit, "microlp does not support a time limit, ignoring");
        }
        for key in params.options.keys() {
            warn!(option = %key, "microlp has no engine options, ignoring");
        }

        match model.problem.solve() {
            Ok(solution) => RawSolution {
                status: SolverStatus::Optimal,
                objective_value: Some(solution.objective()),
                columns: model
                    .variables
                    .iter()
                    .map(|&variable| solution[variable])
                    .collect(),
            },
            Err(microlp::Error::Infeasible) => RawSolution::without_solution(SolverStatus::Infeasible),
            Err(microlp::Error::Unbounded) => RawSolution::without_solution(SolverStatus::Unbounded),
            Err(err) => {
                error!(error = %err, "microlp failed while solving");
                RawSolution::without_solution(SolverStatus::Abnormal)
            }
        }
    }
}

fn add_constraint(
    problem: &mut Problem,
    variables: &[microlp::Variable],
    constraint: &LinearConstraint,
) {
    let mut expression = LinearExpr::empty();
    for &(column, coefficient) in &constraint.terms {
        expression.add(variables[column], coefficient);
    }

    let comparison = match constraint.comparison {
        Comparison::LessOrEqual => ComparisonOp::Le,
        Comparison::GreaterOrEqual => ComparisonOp::Ge,
        Comparison::Equal => ComparisonOp::Eq,
    };

    problem.add_constraint(expression, comparison, constraint.rhs);
}

impl SolverAdapter for MicroLpAdapter {
    fn solver_name(&self) -> &'static str {
        Engine::MicroLp.name()
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
            Engine::MicroLp,
            &self.formulation,
            &mut self.state,
            Self::build,
            Self::run,
            params,
        )
    }

    fn set_weights(&mut self, weights: ObjectiveWeights) {
        debug!(?weights, "Objective weights changed, discarding microlp model");
        self.formulation = self.formulation.with_weights(weights);
        self.state.reset();
    }
}

/// Maximizes a single binary variable; a working engine reports 1.
pub(crate) fn probe() -> Result<(), SolverError> {
    let mut problem = Problem::new(OptimizationDirection::Maximize);
    let x = problem.add_binary_var(1.0);

    let solution = problem
        .solve()
        .map_err(|err| SolverError::EngineUnavailable {
            engine: Engine::MicroLp,
            reason: err.to_string(),
        })?;

    if (solution[x] - 1.0).abs() > 1e-6 {
        return Err(SolverError::EngineUnavailable {
            engine: Engine::MicroLp,
            reason: format!("probe model returned x = {}", solution[x]),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{solver::solver_adapter::AdapterPhase, test_utils};

    fn toy_adapter() -> MicroLpAdapter {
        MicroLpAdapter::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        )
    }

    #[test]
    fn test_probe() {
        assert!(probe().is_ok());
    }

    #[test]
    fn test_solve_toy_instance() {
        let mut adapter = toy_adapter();

        let result = adapter.solve(&EngineParams::default());

        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert_eq!(result.selected_routes, vec!["R1"]);
        assert_eq!(result.buses_on_route("R1"), vec!["V1", "V2"]);
        assert_eq!(result.total_revenue, 100.0);
        assert_eq!(result.total_travel_time, 500.0);
        assert!((result.objective_value - 95.0).abs() < 1e-6);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut adapter = toy_adapter();
        assert!(!adapter.is_built());

        adapter.build_model();
        adapter.build_model();

        assert!(adapter.is_built());
        assert_eq!(adapter.state.phase(), AdapterPhase::Built);
        assert_eq!(
            adapter.state.ensure_built(|| unreachable!()).variables.len(),
            6
        );
    }

    #[test]
    fn test_resolve_reuses_model() {
        let mut adapter = toy_adapter();

        let first = adapter.solve(&EngineParams::default());
        assert_eq!(adapter.state.phase(), AdapterPhase::Solved);
        let second = adapter.solve(&EngineParams::default());

        assert_eq!(first.objective_value, second.objective_value);
        assert_eq!(first.selected_routes, second.selected_routes);
        assert_eq!(first.vehicle_assignments, second.vehicle_assignments);
    }

    #[test]
    fn test_set_weights_forces_rebuild() {
        let mut adapter = toy_adapter();
        adapter.solve(&EngineParams::default());

        adapter.set_weights(ObjectiveWeights {
            revenue: 1.0,
            time: 0.5,
        });
        assert!(!adapter.is_built());

        // R1 is now worth 100 - 250
        let result = adapter.solve(&EngineParams::default());
        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert!(result.selected_routes.is_empty());
        assert!(result.objective_value.abs() < 1e-9);
    }

    #[test]
    fn test_forbidden_assignment_is_bounded() {
        let mut adapter = MicroLpAdapter::new(
            Arc::new(test_utils::create_restricted_toy_problem()),
            test_utils::toy_weights(),
        );

        let result = adapter.solve(&EngineParams::default());

        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert_ne!(
            result.vehicle_assignments.get("V2").map(String::as_str),
            Some("R1")
        );
    }

    #[test]
    fn test_unsupported_params_are_ignored() {
        let mut adapter = toy_adapter();
        let params = EngineParams::default()
            .with_time_limit(jiff::SignedDuration::from_secs(5))
            .with_option("threads", crate::solver::engine_params::EngineOption::Integer(2));

        let result = adapter.solve(&params);

        assert_eq!(result.solver_status, SolverStatus::Optimal);
    }
}
