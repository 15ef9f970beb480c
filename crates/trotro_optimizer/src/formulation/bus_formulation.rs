use std::sync::Arc;

use tracing::debug;

use crate::{
    problem::{
        problem_specification::ProblemSpecification,
        route_candidate::RouteIdx,
        terminal::{Terminal, TerminalIdx},
        vehicle::VehicleIdx,
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    constraint_family::{ConstraintFamily, PermissionEncoding},
    linear_constraint::{Comparison, LinearConstraint},
    objective_weights::ObjectiveWeights,
    variable::{ColumnLayout, Variable},
};

/// The route/vehicle assignment model in engine-independent form.
///
/// Variables are all binary. The objective is maximized:
///
/// ```text
/// Z = w_revenue · Σ_k demand(k)·fare(k)·x[k] − w_time · Σ_k demand(k)·time(k)·x[k]
/// ```
///
/// Adapters walk [`BusFormulation::constraints`] and translate every row into
/// their engine's native model. The formulation holds no engine state and can
/// be shared between adapters.
#[derive(Debug, Clone)]
pub struct BusFormulation {
    problem: Arc<ProblemSpecification>,
    weights: ObjectiveWeights,
    layout: ColumnLayout,
}

impl BusFormulation {
    pub fn new(problem: Arc<ProblemSpecification>, weights: ObjectiveWeights) -> Self {
        let layout = ColumnLayout::new(problem.num_routes(), problem.num_vehicles());
        BusFormulation {
            problem,
            weights,
            layout,
        }
    }

    /// Same instance, new objective weights.
    pub fn with_weights(&self, weights: ObjectiveWeights) -> Self {
        BusFormulation::new(self.problem.clone(), weights)
    }

    pub fn problem(&self) -> &ProblemSpecification {
        &self.problem
    }

    pub fn weights(&self) -> ObjectiveWeights {
        self.weights
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn num_columns(&self) -> usize {
        self.layout.num_columns()
    }

    pub fn variable_name(&self, variable: Variable) -> String {
        match variable {
            Variable::Route(route) => format!("x[{}]", self.problem.route(route).route_id()),
            Variable::Assignment { vehicle, route } => format!(
                "y[{},{}]",
                self.problem.vehicle(vehicle).external_id(),
                self.problem.route(route).route_id()
            ),
        }
    }

    pub fn objective_coefficient(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Route(route) => {
                let route = self.problem.route(route);
                self.weights.revenue * route.daily_revenue()
                    - self.weights.time * route.daily_travel_time()
            }
            Variable::Assignment { .. } => 0.0,
        }
    }

    /// One coefficient per column, in column order.
    pub fn objective_coefficients(&self) -> Vec<f64> {
        self.layout
            .variables()
            .map(|variable| self.objective_coefficient(variable))
            .collect()
    }

    pub fn objective_value(&self, columns: &[f64]) -> f64 {
        self.objective_coefficients()
            .iter()
            .zip(columns)
            .map(|(coefficient, value)| coefficient * value)
            .sum()
    }

    /// Upper bound of a column. Only [`PermissionEncoding::VariableBound`]
    /// pins forbidden assignments to zero here.
    pub fn column_upper_bound(&self, variable: Variable, encoding: PermissionEncoding) -> f64 {
        match (variable, encoding) {
            (Variable::Assignment { vehicle, route }, PermissionEncoding::VariableBound)
                if !self.problem.is_allowed(vehicle, route) =>
            {
                0.0
            }
            _ => 1.0,
        }
    }

    /// Every row of the model, grouped by family in the fixed family order.
    pub fn constraints(&self, encoding: PermissionEncoding) -> Vec<LinearConstraint> {
        let mut constraints = Vec::new();

        constraints.push(self.fleet_size_constraint());
        constraints.extend(self.route_length_constraints());
        constraints.extend(self.min_daily_sales_constraints());
        constraints.extend(self.terminal_capacity_constraints());
        constraints.extend(self.route_permission_constraints(encoding));
        constraints.extend(self.assignment_implies_selection_constraints());
        constraints.extend(self.single_assignment_constraints());
        constraints.extend(self.passenger_capacity_constraints());

        debug!(
            columns = self.num_columns(),
            rows = constraints.len(),
            ?encoding,
            "Generated bus formulation"
        );

        constraints
    }

    /// Rows violated by `columns`, with permissions checked explicitly.
    pub fn violated_constraints(&self, columns: &[f64]) -> Vec<LinearConstraint> {
        self.constraints(PermissionEncoding::EqualityRow)
            .into_iter()
            .filter(|constraint| !constraint.is_satisfied_by(columns))
            .collect()
    }

    pub fn is_feasible(&self, columns: &[f64]) -> bool {
        columns.len() == self.num_columns()
            && columns
                .iter()
                .all(|value| (-1e-6..=1.0 + 1e-6).contains(value))
            && self.violated_constraints(columns).is_empty()
    }

    fn vehicles(&self) -> impl Iterator<Item = VehicleIdx> + '_ {
        VehicleIdx::range(self.problem.num_vehicles())
    }

    fn routes(&self) -> impl Iterator<Item = RouteIdx> + '_ {
        RouteIdx::range(self.problem.num_routes())
    }

    fn assignments_to(&self, route: RouteIdx, coefficient: f64) -> Vec<(usize, f64)> {
        self.vehicles()
            .map(|vehicle| (self.layout.assignment_column(vehicle, route), coefficient))
            .collect()
    }

    fn fleet_size_constraint(&self) -> LinearConstraint {
        let terms = self
            .vehicles()
            .flat_map(|vehicle| {
                self.routes()
                    .map(move |route| (self.layout.assignment_column(vehicle, route), 1.0))
            })
            .collect();

        LinearConstraint {
            family: ConstraintFamily::FleetSize,
            name: String::from("fleet_size"),
            terms,
            comparison: Comparison::LessOrEqual,
            rhs: f64::from(self.problem.general().total_fleet_size),
        }
    }

    fn route_length_constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_ {
        let max_route_length_km = self.problem.general().max_route_length_km;

        self.problem
            .routes()
            .iter()
            .enumerate_idx()
            .map(move |(idx, route): (RouteIdx, _)| LinearConstraint {
                family: ConstraintFamily::RouteLength,
                name: format!("route_length[{}]", route.route_id()),
                terms: vec![(self.layout.route_column(idx), route.distance_km())],
                comparison: Comparison::LessOrEqual,
                rhs: max_route_length_km,
            })
    }

    fn min_daily_sales_constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_ {
        let min_sales = self.problem.general().min_daily_sales_per_bus_ghs;

        self.problem
            .routes()
            .iter()
            .enumerate_idx()
            .map(move |(idx, route): (RouteIdx, _)| {
                let mut terms = vec![(self.layout.route_column(idx), route.daily_revenue())];
                terms.extend(self.assignments_to(idx, -min_sales));

                LinearConstraint {
                    family: ConstraintFamily::MinDailySales,
                    name: format!("min_daily_sales[{}]", route.route_id()),
                    terms,
                    comparison: Comparison::GreaterOrEqual,
                    rhs: 0.0,
                }
            })
    }

    fn terminal_capacity_constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_ {
        self.problem
            .terminals()
            .iter()
            .enumerate_idx()
            .filter_map(move |(terminal_idx, terminal): (TerminalIdx, &Terminal)| {
                let max_buses = terminal.max_buses()?;
                let terms = self
                    .problem
                    .routes_from_terminal(terminal_idx)
                    .flat_map(|(route, _)| self.assignments_to(route, 1.0))
                    .collect();

                Some(LinearConstraint {
                    family: ConstraintFamily::TerminalCapacity,
                    name: format!("terminal_capacity[{}]", terminal.external_id()),
                    terms,
                    comparison: Comparison::LessOrEqual,
                    rhs: f64::from(max_buses),
                })
            })
    }

    fn route_permission_constraints(
        &self,
        encoding: PermissionEncoding,
    ) -> impl Iterator<Item = LinearConstraint> + '_ {
        self.vehicles()
            .flat_map(move |vehicle| self.routes().map(move |route| (vehicle, route)))
            .filter_map(move |(vehicle, route)| {
                let allowed = self.problem.is_allowed(vehicle, route);
                let (comparison, rhs) = match encoding {
                    PermissionEncoding::VariableBound => return None,
                    PermissionEncoding::EqualityRow if allowed => return None,
                    PermissionEncoding::EqualityRow => (Comparison::Equal, 0.0),
                    PermissionEncoding::UpperBoundRow => {
                        (Comparison::LessOrEqual, if allowed { 1.0 } else { 0.0 })
                    }
                };

                Some(LinearConstraint {
                    family: ConstraintFamily::RoutePermission,
                    name: format!(
                        "route_permission[{},{}]",
                        self.problem.vehicle(vehicle).external_id(),
                        self.problem.route(route).route_id()
                    ),
                    terms: vec![(self.layout.assignment_column(vehicle, route), 1.0)],
                    comparison,
                    rhs,
                })
            })
    }

    fn assignment_implies_selection_constraints(
        &self,
    ) -> impl Iterator<Item = LinearConstraint> + '_ {
        self.vehicles()
            .flat_map(move |vehicle| self.routes().map(move |route| (vehicle, route)))
            .map(move |(vehicle, route)| LinearConstraint {
                family: ConstraintFamily::AssignmentImpliesSelection,
                name: format!(
                    "assignment_implies_selection[{},{}]",
                    self.problem.vehicle(vehicle).external_id(),
                    self.problem.route(route).route_id()
                ),
                terms: vec![
                    (self.layout.assignment_column(vehicle, route), 1.0),
                    (self.layout.route_column(route), -1.0),
                ],
                comparison: Comparison::LessOrEqual,
                rhs: 0.0,
            })
    }

    fn single_assignment_constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_ {
        self.vehicles().map(move |vehicle| LinearConstraint {
            family: ConstraintFamily::SingleAssignment,
            name: format!(
                "single_assignment[{}]",
                self.problem.vehicle(vehicle).external_id()
            ),
            terms: self
                .routes()
                .map(|route| (self.layout.assignment_column(vehicle, route), 1.0))
                .collect(),
            comparison: Comparison::LessOrEqual,
            rhs: 1.0,
        })
    }

    fn passenger_capacity_constraints(&self) -> impl Iterator<Item = LinearConstraint> + '_ {
        let capacity = f64::from(self.problem.general().bus_capacity_passengers);

        self.problem
            .routes()
            .iter()
            .enumerate_idx()
            .map(move |(idx, route): (RouteIdx, _)| {
                let mut terms = vec![(
                    self.layout.route_column(idx),
                    f64::from(route.demand_per_day()),
                )];
                terms.extend(self.assignments_to(idx, -capacity));

                LinearConstraint {
                    family: ConstraintFamily::PassengerCapacity,
                    name: format!("passenger_capacity[{}]", route.route_id()),
                    terms,
                    comparison: Comparison::LessOrEqual,
                    rhs: 0.0,
                }
            })
    }
}
