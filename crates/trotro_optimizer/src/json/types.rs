use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::{
    general_parameters::GeneralParameters,
    problem_specification::ProblemSpecification,
    route_candidate::RouteCandidate,
    terminal::TerminalCapacity,
    vehicle_type::VehicleType,
};

pub trait FromProblem<T> {
    fn from_problem(value: T, problem: &ProblemSpecification) -> Self;
}

/// The structured input document of one optimization instance.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "ProblemDocument")]
pub struct JsonProblemDocument {
    pub parameters: JsonParameters,
    pub routes_definition: Vec<JsonRoute>,
    pub terminal_capacity: Vec<TerminalCapacity>,
    pub vehicle_permissions: JsonVehiclePermissions,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "Parameters")]
pub struct JsonParameters {
    pub general: GeneralParameters,
    pub sets: JsonSets,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "Sets")]
pub struct JsonSets {
    pub terminals: Vec<String>,
    pub buses: Vec<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "Route")]
pub struct JsonRoute {
    pub route_id: String,
    pub origin_terminal: String,
    pub stops: Vec<String>,
    pub distance_km: f64,
    pub time_min: f64,
    pub fare_ghs: f64,
    pub demand_per_day: u32,
}

impl FromProblem<&RouteCandidate> for JsonRoute {
    fn from_problem(value: &RouteCandidate, problem: &ProblemSpecification) -> Self {
        JsonRoute {
            route_id: value.route_id().to_owned(),
            origin_terminal: problem
                .terminal(value.origin_terminal())
                .external_id()
                .to_owned(),
            stops: value.stops().to_vec(),
            distance_km: value.distance_km(),
            time_min: value.time_min(),
            fare_ghs: value.fare_ghs(),
            demand_per_day: value.demand_per_day(),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "VehiclePermissions")]
pub struct JsonVehiclePermissions {
    pub vehicle_types: BTreeMap<String, JsonVehicleTypeIds>,
    pub route_allowances: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "VehicleTypeIds")]
pub struct JsonVehicleTypeIds {
    pub ids: Vec<String>,
}

impl From<&VehicleType> for JsonVehicleTypeIds {
    fn from(value: &VehicleType) -> Self {
        JsonVehicleTypeIds {
            ids: value.vehicle_ids().to_vec(),
        }
    }
}

impl FromProblem<&ProblemSpecification> for JsonProblemDocument {
    fn from_problem(value: &ProblemSpecification, _problem: &ProblemSpecification) -> Self {
        JsonProblemDocument {
            parameters: JsonParameters {
                general: value.general().clone(),
                sets: JsonSets {
                    terminals: value
                        .terminals()
                        .iter()
                        .map(|terminal| terminal.external_id().to_owned())
                        .collect(),
                    buses: value
                        .vehicles()
                        .iter()
                        .map(|vehicle| vehicle.external_id().to_owned())
                        .collect(),
                },
            },
            routes_definition: value
                .routes()
                .iter()
                .map(|route| JsonRoute::from_problem(route, value))
                .collect(),
            terminal_capacity: value.terminal_capacities().to_vec(),
            vehicle_permissions: JsonVehiclePermissions {
                vehicle_types: value
                    .vehicle_types()
                    .iter()
                    .map(|vehicle_type| {
                        (
                            vehicle_type.type_name().to_owned(),
                            JsonVehicleTypeIds::from(vehicle_type),
                        )
                    })
                    .collect(),
                route_allowances: value
                    .vehicle_types()
                    .iter()
                    .map(|vehicle_type| {
                        (
                            vehicle_type.type_name().to_owned(),
                            vehicle_type.allowed_routes().to_vec(),
                        )
                    })
                    .collect(),
            },
        }
    }
}
