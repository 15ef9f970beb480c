use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::problem_error::ProblemError;

/// System-wide limits shared by every route and vehicle of one instance.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralParameters {
    pub total_fleet_size: u32,
    pub max_route_length_km: f64,
    pub bus_capacity_passengers: u32,
    pub min_daily_sales_per_bus_ghs: f64,
}

impl GeneralParameters {
    pub(crate) fn validate(&self) -> Result<(), ProblemError> {
        if !self.max_route_length_km.is_finite() || self.max_route_length_km <= 0.0 {
            return Err(ProblemError::InvalidParameter {
                field: "max_route_length_km",
                reason: format!("must be a positive number, got {}", self.max_route_length_km),
            });
        }

        if self.bus_capacity_passengers == 0 {
            return Err(ProblemError::InvalidParameter {
                field: "bus_capacity_passengers",
                reason: String::from("must be greater than zero"),
            });
        }

        if !self.min_daily_sales_per_bus_ghs.is_finite() || self.min_daily_sales_per_bus_ghs < 0.0
        {
            return Err(ProblemError::InvalidParameter {
                field: "min_daily_sales_per_bus_ghs",
                reason: format!(
                    "must be a non-negative number, got {}",
                    self.min_daily_sales_per_bus_ghs
                ),
            });
        }

        Ok(())
    }
}
