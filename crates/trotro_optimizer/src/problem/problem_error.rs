use thiserror::Error;

/// Raised while reading or validating a problem document. Every variant names
/// the offending field or id.
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("failed to read problem document: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed problem document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parameters.general.{field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("routes_definition[{route_id}].{field}: {reason}")]
    InvalidRouteMetric {
        route_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("route `{route_id}` originates at unknown terminal `{terminal_id}`")]
    UnknownOriginTerminal {
        route_id: String,
        terminal_id: String,
    },

    #[error("terminal_capacity references unknown terminal `{0}`")]
    UnknownCapacityTerminal(String),

    #[error("bus `{0}` is not listed by any vehicle type")]
    UntypedVehicle(String),

    #[error("bus `{vehicle_id}` is listed by both vehicle types `{first}` and `{second}`")]
    VehicleInMultipleTypes {
        vehicle_id: String,
        first: String,
        second: String,
    },

    #[error("vehicle type `{type_name}` lists unknown bus `{vehicle_id}`")]
    UnknownTypedVehicle {
        type_name: String,
        vehicle_id: String,
    },

    #[error("vehicle_permissions.vehicle_types.{type_name} lists bus `{vehicle_id}` twice")]
    DuplicateTypedVehicle {
        type_name: String,
        vehicle_id: String,
    },

    #[error("vehicle_permissions.route_allowances has no entry for vehicle type `{0}`")]
    MissingRouteAllowances(String),
}
