use fxhash::FxHashSet;
use serde::Serialize;

use crate::{define_index_newtype, problem::route_candidate::RouteIdx};

define_index_newtype!(VehicleTypeIdx, VehicleType);

/// A class of vehicles and the routes it may serve. Vehicle types partition
/// the fleet.
#[derive(Serialize, Debug, Clone)]
pub struct VehicleType {
    pub(crate) type_name: String,
    pub(crate) vehicle_ids: Vec<String>,
    pub(crate) allowed_routes: Vec<String>,
    #[serde(skip)]
    pub(crate) allowed_route_indices: FxHashSet<RouteIdx>,
}

impl VehicleType {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn vehicle_ids(&self) -> &[String] {
        &self.vehicle_ids
    }

    /// Allowed route ids as given in the document, including ids that name no
    /// known route.
    pub fn allowed_routes(&self) -> &[String] {
        &self.allowed_routes
    }

    #[inline]
    pub fn allows(&self, route: RouteIdx) -> bool {
        self.allowed_route_indices.contains(&route)
    }
}
