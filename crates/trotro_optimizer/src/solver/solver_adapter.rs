use tracing::{info, instrument};

use crate::{
    formulation::{bus_formulation::BusFormulation, objective_weights::ObjectiveWeights},
    timer_debug,
    utils::time::measure,
};

#[cfg(feature = "cbc")]
use super::adapters::cbc_adapter::CbcAdapter;
#[cfg(feature = "highs")]
use super::adapters::highs_adapter::HighsAdapter;
use super::{
    adapters::microlp_adapter::MicroLpAdapter,
    engine::Engine,
    engine_params::EngineParams,
    optimization_result::OptimizationResult,
    result_normalizer::{RawSolution, normalize},
};

/// Translates the shared formulation into one engine's native model and runs
/// it. Engine failures surface as a result status, never as an error.
pub trait SolverAdapter {
    fn solver_name(&self) -> &'static str;

    fn formulation(&self) -> &BusFormulation;

    fn is_built(&self) -> bool;

    /// Materializes the native model. No-op when already built.
    fn build_model(&mut self);

    /// Builds when needed, then solves.
    fn solve(&mut self, params: &EngineParams) -> OptimizationResult;

    /// Replaces the objective weights. The native model is discarded and
    /// rebuilt on the next solve.
    fn set_weights(&mut self, weights: ObjectiveWeights);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterPhase {
    Unbuilt,
    Built,
    Solved,
}

/// Lifecycle of the native model `M` owned by an adapter.
#[derive(Debug)]
pub struct AdapterState<M> {
    model: Option<M>,
    solved: bool,
}

impl<M> Default for AdapterState<M> {
    fn default() -> Self {
        AdapterState {
            model: None,
            solved: false,
        }
    }
}

impl<M> AdapterState<M> {
    pub fn phase(&self) -> AdapterPhase {
        match (&self.model, self.solved) {
            (None, _) => AdapterPhase::Unbuilt,
            (Some(_), false) => AdapterPhase::Built,
            (Some(_), true) => AdapterPhase::Solved,
        }
    }

    pub fn is_built(&self) -> bool {
        self.model.is_some()
    }

    pub fn ensure_built(&mut self, build: impl FnOnce() -> M) -> &mut M {
        self.model.get_or_insert_with(build)
    }

    pub fn mark_solved(&mut self) {
        self.solved = self.model.is_some();
    }

    pub fn reset(&mut self) {
        self.model = None;
        self.solved = false;
    }
}

/// Common build/solve/normalize flow shared by every adapter.
#[instrument(skip_all, level = "debug", fields(engine = %engine))]
pub(crate) fn solve_native<M>(
    engine: Engine,
    formulation: &BusFormulation,
    state: &mut AdapterState<M>,
    build: impl FnOnce(&BusFormulation) -> M,
    run: impl FnOnce(&BusFormulation, &mut M, &EngineParams) -> RawSolution,
    params: &EngineParams,
) -> OptimizationResult {
    let model = state.ensure_built(|| timer_debug!("Build native model", build(formulation)));

    info!(
        engine = %engine,
        routes = formulation.problem().num_routes(),
        vehicles = formulation.problem().num_vehicles(),
        "Solving bus optimization"
    );

    let (raw, solve_time) = measure(|| run(formulation, model, params));
    state.mark_solved();

    let result = normalize(formulation, raw, solve_time);

    info!(
        engine = %engine,
        status = %result.solver_status,
        objective = result.objective_value,
        selected_routes = result.selected_routes.len(),
        seconds = result.solve_time,
        "Solved bus optimization"
    );

    result
}

/// Tagged dispatch over the adapters compiled into this build.
pub enum SolverAdapterType {
    MicroLp(MicroLpAdapter),
    #[cfg(feature = "highs")]
    Highs(HighsAdapter),
    #[cfg(feature = "cbc")]
    Cbc(CbcAdapter),
}

impl SolverAdapterType {
    pub fn engine(&self) -> Engine {
        match self {
            Self::MicroLp(_) => Engine::MicroLp,
            #[cfg(feature = "highs")]
            Self::Highs(_) => Engine::Highs,
            #[cfg(feature = "cbc")]
            Self::Cbc(_) => Engine::Cbc,
        }
    }
}

impl SolverAdapter for SolverAdapterType {
    fn solver_name(&self) -> &'static str {
        match self {
            Self::MicroLp(adapter) => adapter.solver_name(),
            #[cfg(feature = "highs")]
            Self::Highs(adapter) => adapter.solver_name(),
            #[cfg(feature = "cbc")]
            Self::Cbc(adapter) => adapter.solver_name(),
        }
    }

    fn formulation(&self) -> &BusFormulation {
        match self {
            Self::MicroLp(adapter) => adapter.formulation(),
            #[cfg(feature = "highs")]
            Self::Highs(adapter) => adapter.formulation(),
            #[cfg(feature = "cbc")]
            Self::Cbc(adapter) => adapter.formulation(),
        }
    }

    fn is_built(&self) -> bool {
        match self {
            Self::MicroLp(adapter) => adapter.is_built(),
            #[cfg(feature = "highs")]
            Self::Highs(adapter) => adapter.is_built(),
            #[cfg(feature = "cbc")]
            Self::Cbc(adapter) => adapter.is_built(),
        }
    }

    fn build_model(&mut self) {
        match self {
            Self::MicroLp(adapter) => adapter.build_model(),
            #[cfg(feature = "highs")]
            Self::Highs(adapter) => adapter.build_model(),
            #[cfg(feature = "cbc")]
            Self::Cbc(adapter) => adapter.build_model(),
        }
    }

    fn solve(&mut self, params: &EngineParams) -> OptimizationResult {
        match self {
            Self::MicroLp(adapter) => adapter.solve(params),
            #[cfg(feature = "highs")]
            Self::Highs(adapter) => adapter.solve(params),
            #[cfg(feature = "cbc")]
            Self::Cbc(adapter) => adapter.solve(params),
        }
    }

    fn set_weights(&mut self, weights: ObjectiveWeights) {
        match self {
            Self::MicroLp(adapter) => adapter.set_weights(weights),
            #[cfg(feature = "highs")]
            Self::Highs(adapter) => adapter.set_weights(weights),
            #[cfg(feature = "cbc")]
            Self::Cbc(adapter) => adapter.set_weights(weights),
        }
    }
}
