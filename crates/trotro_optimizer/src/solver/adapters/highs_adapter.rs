use std::sync::Arc;

use highs::{Col, HighsModelStatus, RowProblem, Sense};
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
        engine_params::{EngineOption, EngineParams},
        optimization_result::OptimizationResult,
        result_normalizer::RawSolution,
        solver_adapter::{AdapterState, SolverAdapter, SolverAdapterType, solve_native},
        solver_error::SolverError,
        solver_status::SolverStatus,
    },
};

const PERMISSION_ENCODING: PermissionEncoding = PermissionEncoding::EqualityRow;

/// HiGHS consumes its problem when optimising, so the row problem is kept and
/// cloned for every solve.
pub struct HighsModel {
    problem: RowProblem,
}

pub struct HighsAdapter {
    formulation: BusFormulation,
    state: AdapterState<HighsModel>,
}

impl HighsAdapter {
    pub fn new(problem: Arc<ProblemSpecification>, weights: ObjectiveWeights) -> Self {
        HighsAdapter {
            formulation: BusFormulation::new(problem, weights),
            state: AdapterState::default(),
        }
    }

    pub(crate) fn create(
        problem: Arc<ProblemSpecification>,
        weights: ObjectiveWeights,
    ) -> Result<SolverAdapterType, SolverError> {
        Ok(SolverAdapterType::Highs(HighsAdapter::new(problem, weights)))
    }

    fn build(formulation: &BusFormulation) -> HighsModel {
        let mut problem = RowProblem::default();

        let columns = formulation
            .layout()
            .variables()
            .map(|variable| {
                let upper = formulation.column_upper_bound(variable, PERMISSION_ENCODING);
                problem.add_integer_column(formulation.objective_coefficient(variable), 0.0..=upper)
            })
            .collect::<Vec<_>>();

        for constraint in formulation.constraints(PERMISSION_ENCODING) {
            add_row(&mut problem, &columns, &constraint);
        }

        HighsModel { problem }
    }

    fn run(_: &BusFormulation, model: &mut HighsModel, params: &EngineParams) -> RawSolution {
        let mut highs = model.problem.clone().optimise(Sense::Maximise);

        if !params.verbose {
            highs.make_quiet();
        }
        if let Some(time_limit) = params.time_limit {
            if let Err(status) = highs.try_set_option("time_limit", time_limit.as_secs_f64()) {
                warn!(?status, "HiGHS rejected the time limit");
            }
        }
        for (key, value) in &params.options {
            let applied = match value {
                EngineOption::Bool(value) => highs.try_set_option(key.as_str(), *value),
                EngineOption::Integer(value) => match i32::try_from(*value) {
                    Ok(value) => highs.try_set_option(key.as_str(), value),
                    Err(_) => highs.try_set_option(key.as_str(), *value as f64),
                },
                EngineOption::Float(value) => highs.try_set_option(key.as_str(), *value),
                EngineOption::Text(value) => highs.try_set_option(key.as_str(), value.as_str()),
            };
            if let Err(status) = applied {
                warn!(option = %key, %value, ?status, "HiGHS rejected the option, ignoring");
            }
        }

        let solved = match highs.try_solve() {
            Ok(solved) => solved,
            Err(status) => {
                error!(?status, "HiGHS failed while solving");
                return RawSolution::without_solution(SolverStatus::Abnormal);
            }
        };

        let columns = solved.get_solution().columns().to_vec();
        let status = map_status(solved.status());

        RawSolution {
            status,
            objective_value: None,
            columns,
        }
    }
}

/// A limit hit before proven optimality reports the limit, whatever incumbent
/// HiGHS holds.
fn map_status(status: HighsModelStatus) -> SolverStatus {
    match status {
        HighsModelStatus::Optimal => SolverStatus::Optimal,
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            SolverStatus::Infeasible
        }
        HighsModelStatus::Unbounded => SolverStatus::Unbounded,
        HighsModelStatus::ReachedTimeLimit => SolverStatus::TimeLimit,
        HighsModelStatus::ReachedIterationLimit => SolverStatus::NotSolved,
        HighsModelStatus::ObjectiveBound | HighsModelStatus::ObjectiveTarget => {
            SolverStatus::Feasible
        }
        HighsModelStatus::LoadError
        | HighsModelStatus::ModelError
        | HighsModelStatus::PresolveError
        | HighsModelStatus::SolveError
        | HighsModelStatus::PostsolveError => SolverStatus::Abnormal,
        HighsModelStatus::NotSet | HighsModelStatus::ModelEmpty => SolverStatus::NotSolved,
        #[allow(unreachable_patterns)]
        _ => SolverStatus::Unknown,
    }
}

fn add_row(problem: &mut RowProblem, columns: &[Col], constraint: &LinearConstraint) {
    let factors = constraint
        .terms
        .iter()
        .map(|&(column, coefficient)| (columns[column], coefficient))
        .collect::<Vec<_>>();

    match constraint.comparison {
        Comparison::LessOrEqual => {
            problem.add_row(..=constraint.rhs, factors);
        }
        Comparison::GreaterOrEqual => {
            problem.add_row(constraint.rhs.., factors);
        }
        Comparison::Equal => {
            problem.add_row(constraint.rhs..=constraint.rhs, factors);
        }
    }
}

impl SolverAdapter for HighsAdapter {
    fn solver_name(&self) -> &'static str {
        Engine::Highs.name()
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
            Engine::Highs,
            &self.formulation,
            &mut self.state,
            Self::build,
            Self::run,
            params,
        )
    }

    fn set_weights(&mut self, weights: ObjectiveWeights) {
        debug!(?weights, "Objective weights changed, discarding HiGHS model");
        self.formulation = self.formulation.with_weights(weights);
        self.state.reset();
    }
}

pub(crate) fn probe() -> Result<(), SolverError> {
    let unavailable = |reason: String| SolverError::EngineUnavailable {
        engine: Engine::Highs,
        reason,
    };

    let mut problem = RowProblem::default();
    problem.add_integer_column(1.0, 0.0..=1.0);

    let mut highs = problem.optimise(Sense::Maximise);
    highs.make_quiet();
    let solved = highs
        .try_solve()
        .map_err(|status| unavailable(format!("probe solve failed with {status:?}")))?;

    let x = solved.get_solution().columns().first().copied().unwrap_or(0.0);
    if solved.status() != HighsModelStatus::Optimal || (x - 1.0).abs() > 1e-6 {
        return Err(unavailable(format!(
            "probe model returned {:?} with x = {x}",
            solved.status()
        )));
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
        let mut adapter = HighsAdapter::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        );

        let result = adapter.solve(&EngineParams::default());

        assert_eq!(result.solver_status, SolverStatus::Optimal);
        assert_eq!(result.selected_routes, vec!["R1"]);
        assert_eq!(result.buses_on_route("R1"), vec!["V1", "V2"]);
        assert!((result.objective_value - 95.0).abs() < 1e-6);
    }

    #[test]
    fn test_limits_report_no_solution() {
        let formulation = BusFormulation::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        );
        let feasible_columns = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0];

        for (native, expected) in [
            (HighsModelStatus::ReachedTimeLimit, SolverStatus::TimeLimit),
            (HighsModelStatus::ReachedIterationLimit, SolverStatus::NotSolved),
        ] {
            let raw = RawSolution {
                status: map_status(native),
                objective_value: None,
                columns: feasible_columns.clone(),
            };

            let result = normalize(&formulation, raw, jiff::SignedDuration::from_secs(2));

            assert_eq!(result, OptimizationResult::empty(expected, 2.0));
        }
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let mut adapter = HighsAdapter::new(
            Arc::new(test_utils::create_toy_problem()),
            test_utils::toy_weights(),
        );
        let params = EngineParams::default()
            .with_option("not_a_highs_option", EngineOption::Integer(1))
            .with_time_limit(jiff::SignedDuration::from_secs(10));

        let result = adapter.solve(&params);

        assert_eq!(result.solver_status, SolverStatus::Optimal);
    }
}
