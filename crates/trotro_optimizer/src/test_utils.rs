use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::{
    formulation::objective_weights::ObjectiveWeights,
    problem::problem_specification::ProblemSpecification,
};

pub fn data_fixture_path(fixture: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../data/fixtures/")
        .join(fixture)
        .canonicalize()
        .unwrap()
}

//
//  T1 ──R1── (5 km, 10 min, 50 pax/day, 2 GHS)
//  T1 ──R2── (8 km, 20 min, 30 pax/day, 3 GHS)
//
//  Two minibuses V1, V2 with 40 seats. R1 needs both of them.
//
pub fn toy_document() -> Value {
    json!({
        "parameters": {
            "general": {
                "total_fleet_size": 2,
                "max_route_length_km": 10.0,
                "bus_capacity_passengers": 40,
                "min_daily_sales_per_bus_ghs": 10.0
            },
            "sets": {
                "terminals": ["T1"],
                "buses": ["V1", "V2"]
            }
        },
        "routes_definition": [
            {
                "route_id": "R1",
                "origin_terminal": "T1",
                "stops": ["T1", "S1", "S2"],
                "distance_km": 5.0,
                "time_min": 10.0,
                "fare_ghs": 2.0,
                "demand_per_day": 50
            },
            {
                "route_id": "R2",
                "origin_terminal": "T1",
                "stops": ["T1", "S3"],
                "distance_km": 8.0,
                "time_min": 20.0,
                "fare_ghs": 3.0,
                "demand_per_day": 30
            }
        ],
        "terminal_capacity": [
            { "terminal_id": "T1", "max_buses": 2 }
        ],
        "vehicle_permissions": {
            "vehicle_types": {
                "minibus": { "ids": ["V1", "V2"] }
            },
            "route_allowances": {
                "minibus": ["R1", "R2"]
            }
        }
    })
}

pub fn create_toy_problem() -> ProblemSpecification {
    ProblemSpecification::from_json_str(&toy_document().to_string()).unwrap()
}

/// Toy instance where V2 is a coach that may only serve R2.
pub fn create_restricted_toy_problem() -> ProblemSpecification {
    let mut document = toy_document();
    document["vehicle_permissions"] = json!({
        "vehicle_types": {
            "minibus": { "ids": ["V1"] },
            "coach": { "ids": ["V2"] }
        },
        "route_allowances": {
            "minibus": ["R1", "R2"],
            "coach": ["R2"]
        }
    });

    ProblemSpecification::from_json_str(&document.to_string()).unwrap()
}

pub fn toy_weights() -> ObjectiveWeights {
    ObjectiveWeights {
        revenue: 1.0,
        time: 0.01,
    }
}
