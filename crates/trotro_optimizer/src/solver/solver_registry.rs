use std::{
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};

use tracing::{debug, info, instrument, warn};

use crate::{
    formulation::objective_weights::ObjectiveWeights,
    problem::problem_specification::ProblemSpecification,
};

use super::{
    adapters,
    engine::Engine,
    engine_params::EngineParams,
    optimization_result::OptimizationResult,
    solver_adapter::{SolverAdapter, SolverAdapterType},
    solver_error::SolverError,
};

pub type AdapterConstructor =
    fn(Arc<ProblemSpecification>, ObjectiveWeights) -> Result<SolverAdapterType, SolverError>;

static GLOBAL_REGISTRY: OnceLock<SolverRegistry> = OnceLock::new();

/// Maps engines to adapter constructors. Built once and read-only afterwards.
#[derive(Default, Clone)]
pub struct SolverRegistry {
    constructors: BTreeMap<Engine, AdapterConstructor>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        SolverRegistry::default()
    }

    /// Registers every linked engine whose probe model solves.
    #[instrument(level = "debug")]
    pub fn detect() -> Self {
        let mut registry = SolverRegistry::new();

        for engine in Engine::ALL {
            let Some(constructor) = adapters::constructor(engine) else {
                debug!(%engine, "Engine not compiled in");
                continue;
            };

            match adapters::probe(engine) {
                Ok(()) => registry.register(engine, constructor),
                Err(err) => warn!(%engine, error = %err, "Engine probe failed, skipping"),
            }
        }

        info!(engines = ?registry.names(), "Detected solver engines");
        registry
    }

    /// The process-wide registry, detected on first use.
    pub fn global() -> &'static SolverRegistry {
        GLOBAL_REGISTRY.get_or_init(SolverRegistry::detect)
    }

    pub fn register(&mut self, engine: Engine, constructor: AdapterConstructor) {
        self.constructors.insert(engine, constructor);
    }

    pub fn is_registered(&self, engine: Engine) -> bool {
        self.constructors.contains_key(&engine)
    }

    pub fn engines(&self) -> Vec<Engine> {
        self.constructors.keys().copied().collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.constructors.keys().map(Engine::name).collect()
    }

    pub fn resolve(&self, engine_name: &str) -> Result<Engine, SolverError> {
        engine_name
            .parse::<Engine>()
            .ok()
            .filter(|engine| self.is_registered(*engine))
            .ok_or_else(|| SolverError::UnknownEngine {
                requested: engine_name.to_owned(),
                registered: self.names().into_iter().map(str::to_owned).collect(),
            })
    }

    pub fn create_adapter(
        &self,
        engine_name: &str,
        problem: Arc<ProblemSpecification>,
        weights: ObjectiveWeights,
    ) -> Result<SolverAdapterType, SolverError> {
        let engine = self.resolve(engine_name)?;
        let constructor = self
            .constructors
            .get(&engine)
            .ok_or_else(|| SolverError::EngineUnavailable {
                engine,
                reason: String::from("no constructor registered"),
            })?;

        constructor(problem, weights)
    }

    /// Builds a fresh adapter for the engine, solves and normalizes.
    #[instrument(skip_all, level = "debug", fields(engine = engine_name))]
    pub fn solve(
        &self,
        problem: Arc<ProblemSpecification>,
        engine_name: &str,
        weights: Option<ObjectiveWeights>,
        params: &EngineParams,
    ) -> Result<OptimizationResult, SolverError> {
        let mut adapter =
            self.create_adapter(engine_name, problem, weights.unwrap_or_default())?;
        adapter.build_model();
        Ok(adapter.solve(params))
    }
}
