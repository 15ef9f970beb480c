use std::sync::Arc;

use crate::{
    formulation::objective_weights::ObjectiveWeights,
    problem::problem_specification::ProblemSpecification,
};

use super::{
    engine_params::EngineParams, optimization_result::OptimizationResult,
    solver_error::SolverError, solver_registry::SolverRegistry,
};

/// Solves `problem` with the named engine from the process-wide registry.
/// Missing weights default to `{revenue: 1.0, time: 0.1}`.
pub fn solve_bus_optimization(
    problem: Arc<ProblemSpecification>,
    engine_name: &str,
    weights: Option<ObjectiveWeights>,
    params: &EngineParams,
) -> Result<OptimizationResult, SolverError> {
    SolverRegistry::global().solve(problem, engine_name, weights, params)
}

/// Engines usable in this process.
pub fn available_engines() -> Vec<&'static str> {
    SolverRegistry::global().names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_available_engines_include_microlp() {
        assert!(available_engines().contains(&"microlp"));
    }

    #[test]
    fn test_every_available_engine_agrees_on_toy_instance() {
        let problem = Arc::new(test_utils::create_toy_problem());

        for engine in available_engines() {
            let result = solve_bus_optimization(
                problem.clone(),
                engine,
                Some(test_utils::toy_weights()),
                &EngineParams::default(),
            )
            .unwrap();

            assert_eq!(result.selected_routes, vec!["R1"], "engine {engine}");
            assert_eq!(result.num_assigned_vehicles(), 2, "engine {engine}");
            assert_eq!(result.total_revenue, 100.0, "engine {engine}");
            assert_eq!(result.total_travel_time, 500.0, "engine {engine}");
        }
    }

    #[test]
    fn test_default_weights() {
        let problem = Arc::new(test_utils::create_toy_problem());

        let result =
            solve_bus_optimization(problem, "microlp", None, &EngineParams::default()).unwrap();

        // 100 - 0.1 * 500
        assert!((result.objective_value - 50.0).abs() < 1e-6);
        assert_eq!(result.selected_routes, vec!["R1"]);
    }
}
