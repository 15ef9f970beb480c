use crate::problem::{route_candidate::RouteIdx, vehicle::VehicleIdx};

/// A binary decision variable of the formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// `x[route]`: the route is operated.
    Route(RouteIdx),
    /// `y[vehicle, route]`: the vehicle is assigned to the route.
    Assignment { vehicle: VehicleIdx, route: RouteIdx },
}

/// Maps variables to dense column indices. Route columns come first, then one
/// column per (vehicle, route) pair in vehicle-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    num_routes: usize,
    num_vehicles: usize,
}

impl ColumnLayout {
    pub fn new(num_routes: usize, num_vehicles: usize) -> Self {
        ColumnLayout {
            num_routes,
            num_vehicles,
        }
    }

    pub fn num_routes(&self) -> usize {
        self.num_routes
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn num_columns(&self) -> usize {
        self.num_routes + self.num_routes * self.num_vehicles
    }

    #[inline]
    pub fn route_column(&self, route: RouteIdx) -> usize {
        route.get()
    }

    #[inline]
    pub fn assignment_column(&self, vehicle: VehicleIdx, route: RouteIdx) -> usize {
        self.num_routes + vehicle.get() * self.num_routes + route.get()
    }

    pub fn column(&self, variable: Variable) -> usize {
        match variable {
            Variable::Route(route) => self.route_column(route),
            Variable::Assignment { vehicle, route } => self.assignment_column(vehicle, route),
        }
    }

    pub fn variable(&self, column: usize) -> Option<Variable> {
        if column < self.num_routes {
            return Some(Variable::Route(RouteIdx::new(column)));
        }

        if column >= self.num_columns() {
            return None;
        }

        let offset = column - self.num_routes;
        Some(Variable::Assignment {
            vehicle: VehicleIdx::new(offset / self.num_routes),
            route: RouteIdx::new(offset % self.num_routes),
        })
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        (0..self.num_columns()).filter_map(|column| self.variable(column))
    }
}
