pub mod bus_formulation;
pub mod constraint_family;
pub mod linear_constraint;
pub mod objective_weights;
pub mod variable;
