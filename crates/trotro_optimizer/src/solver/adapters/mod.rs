#[cfg(feature = "cbc")]
pub mod cbc_adapter;
#[cfg(feature = "highs")]
pub mod highs_adapter;
pub mod microlp_adapter;

use super::{engine::Engine, solver_error::SolverError, solver_registry::AdapterConstructor};

/// Constructor of the engine's adapter, when the engine is compiled in.
pub(crate) fn constructor(engine: Engine) -> Option<AdapterConstructor> {
    match engine {
        Engine::MicroLp => Some(microlp_adapter::MicroLpAdapter::create),
        #[cfg(feature = "highs")]
        Engine::Highs => Some(highs_adapter::HighsAdapter::create),
        #[cfg(feature = "cbc")]
        Engine::Cbc => Some(cbc_adapter::CbcAdapter::create),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Solves the engine's trivial one-variable model.
pub(crate) fn probe(engine: Engine) -> Result<(), SolverError> {
    match engine {
        Engine::MicroLp => microlp_adapter::probe(),
        #[cfg(feature = "highs")]
        Engine::Highs => highs_adapter::probe(),
        #[cfg(feature = "cbc")]
        Engine::Cbc => cbc_adapter::probe(),
        #[allow(unreachable_patterns)]
        _ => Err(SolverError::EngineUnavailable {
            engine,
            reason: format!("not compiled in, enable the `{}` feature", engine.name()),
        }),
    }
}
