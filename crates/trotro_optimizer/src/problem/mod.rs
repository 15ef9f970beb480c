pub mod general_parameters;
pub mod problem_error;
pub mod problem_specification;
pub mod route_candidate;
pub mod terminal;
pub mod vehicle;
pub mod vehicle_type;
