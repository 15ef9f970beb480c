use thiserror::Error;

use crate::problem::problem_error::ProblemError;

use super::engine::Engine;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unknown solver engine `{requested}`, registered engines: [{}]", .registered.join(", "))]
    UnknownEngine {
        requested: String,
        registered: Vec<String>,
    },

    #[error("solver engine `{engine}` is unavailable: {reason}")]
    EngineUnavailable { engine: Engine, reason: String },

    #[error(transparent)]
    Problem(#[from] ProblemError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_engine_lists_registered_names() {
        let error = SolverError::UnknownEngine {
            requested: String::from("nonexistent"),
            registered: vec![String::from("microlp"), String::from("highs")],
        };

        assert_eq!(
            error.to_string(),
            "unknown solver engine `nonexistent`, registered engines: [microlp, highs]"
        );
    }
}
