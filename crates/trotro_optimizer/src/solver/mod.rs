pub mod adapters;
pub mod engine;
pub mod engine_params;
pub mod optimization_result;
pub mod result_normalizer;
pub mod solve;
pub mod solver_adapter;
pub mod solver_error;
pub mod solver_registry;
pub mod solver_status;
