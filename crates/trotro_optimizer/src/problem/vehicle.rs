use serde::Serialize;

use crate::{define_index_newtype, problem::vehicle_type::VehicleTypeIdx};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    pub(crate) external_id: String,
    pub(crate) vehicle_type: VehicleTypeIdx,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn vehicle_type(&self) -> VehicleTypeIdx {
        self.vehicle_type
    }
}
