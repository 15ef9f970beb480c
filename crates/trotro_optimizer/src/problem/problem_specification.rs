use std::{fs::File, io::BufReader, io::Read, path::Path};

use fxhash::{FxHashMap, FxHashSet};
use jiff::Timestamp;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    json::types::{FromProblem, JsonProblemDocument},
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    general_parameters::GeneralParameters,
    problem_error::ProblemError,
    route_candidate::{RouteCandidate, RouteIdx},
    terminal::{Terminal, TerminalCapacity, TerminalIdx},
    vehicle::{Vehicle, VehicleIdx},
    vehicle_type::{VehicleType, VehicleTypeIdx},
};

/// One validated optimization instance. Immutable once constructed; every
/// id-based lookup is pre-indexed.
#[derive(Debug)]
pub struct ProblemSpecification {
    id: Uuid,
    created_at: Timestamp,
    general: GeneralParameters,
    terminals: Vec<Terminal>,
    vehicles: Vec<Vehicle>,
    routes: Vec<RouteCandidate>,
    terminal_capacities: Vec<TerminalCapacity>,
    vehicle_types: Vec<VehicleType>,

    route_index: FxHashMap<String, RouteIdx>,
    terminal_index: FxHashMap<String, TerminalIdx>,
    vehicle_index: FxHashMap<String, VehicleIdx>,
    vehicle_type_index: FxHashMap<String, VehicleTypeIdx>,

    /// `vehicle * routes.len() + route`
    precomputed_permissions: Vec<bool>,
}

impl ProblemSpecification {
    pub fn from_json_str(json: &str) -> Result<Self, ProblemError> {
        let document: JsonProblemDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProblemError> {
        let document: JsonProblemDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ProblemError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    #[instrument(skip_all, level = "debug")]
    pub fn from_document(document: JsonProblemDocument) -> Result<Self, ProblemError> {
        let JsonProblemDocument {
            parameters,
            routes_definition,
            terminal_capacity,
            vehicle_permissions,
        } = document;

        let general = parameters.general;
        general.validate()?;

        let mut terminal_index: FxHashMap<String, TerminalIdx> = FxHashMap::default();
        let mut terminals = Vec::with_capacity(parameters.sets.terminals.len());
        for (idx, terminal_id) in parameters.sets.terminals.into_iter().enumerate_idx() {
            if terminal_index.insert(terminal_id.clone(), idx).is_some() {
                return Err(ProblemError::DuplicateId {
                    kind: "terminal",
                    id: terminal_id,
                });
            }
            terminals.push(Terminal {
                external_id: terminal_id,
                max_buses: None,
            });
        }

        let mut seen_capacities = FxHashSet::default();
        for capacity in &terminal_capacity {
            let Some(&idx) = terminal_index.get(&capacity.terminal_id) else {
                return Err(ProblemError::UnknownCapacityTerminal(
                    capacity.terminal_id.clone(),
                ));
            };
            if !seen_capacities.insert(idx) {
                return Err(ProblemError::DuplicateId {
                    kind: "terminal_capacity",
                    id: capacity.terminal_id.clone(),
                });
            }
            terminals[idx.get()].max_buses = Some(capacity.max_buses);
        }

        let mut route_index: FxHashMap<String, RouteIdx> = FxHashMap::default();
        let mut routes = Vec::with_capacity(routes_definition.len());
        for (idx, route) in routes_definition.into_iter().enumerate_idx() {
            let Some(&origin_terminal) = terminal_index.get(&route.origin_terminal) else {
                return Err(ProblemError::UnknownOriginTerminal {
                    route_id: route.route_id,
                    terminal_id: route.origin_terminal,
                });
            };
            if route_index.insert(route.route_id.clone(), idx).is_some() {
                return Err(ProblemError::DuplicateId {
                    kind: "route",
                    id: route.route_id,
                });
            }

            let candidate = RouteCandidate {
                route_id: route.route_id,
                origin_terminal,
                stops: route.stops,
                distance_km: route.distance_km,
                time_min: route.time_min,
                fare_ghs: route.fare_ghs,
                demand_per_day: route.demand_per_day,
            };
            candidate.validate()?;
            routes.push(candidate);
        }

        let mut vehicle_index: FxHashMap<String, VehicleIdx> = FxHashMap::default();
        for (idx, vehicle_id) in parameters.sets.buses.iter().enumerate_idx() {
            if vehicle_index.insert(vehicle_id.clone(), idx).is_some() {
                return Err(ProblemError::DuplicateId {
                    kind: "bus",
                    id: vehicle_id.clone(),
                });
            }
        }

        let mut route_allowances = vehicle_permissions.route_allowances;
        let mut vehicle_type_index: FxHashMap<String, VehicleTypeIdx> = FxHashMap::default();
        let mut vehicle_types = Vec::with_capacity(vehicle_permissions.vehicle_types.len());
        let mut vehicle_type_of: Vec<Option<VehicleTypeIdx>> = vec![None; vehicle_index.len()];

        for (type_idx, (type_name, ids)) in vehicle_permissions
            .vehicle_types
            .into_iter()
            .enumerate_idx()
        {
            let Some(allowed_routes) = route_allowances.remove(&type_name) else {
                return Err(ProblemError::MissingRouteAllowances(type_name));
            };

            for vehicle_id in &ids.ids {
                let Some(&vehicle) = vehicle_index.get(vehicle_id) else {
                    return Err(ProblemError::UnknownTypedVehicle {
                        type_name,
                        vehicle_id: vehicle_id.clone(),
                    });
                };

                if let Some(previous) = vehicle_type_of[vehicle.get()] {
                    if previous == type_idx {
                        return Err(ProblemError::DuplicateTypedVehicle {
                            type_name,
                            vehicle_id: vehicle_id.clone(),
                        });
                    }
                    let previous: &VehicleType = &vehicle_types[previous];
                    return Err(ProblemError::VehicleInMultipleTypes {
                        vehicle_id: vehicle_id.clone(),
                        first: previous.type_name.clone(),
                        second: type_name,
                    });
                }
                vehicle_type_of[vehicle.get()] = Some(type_idx);
            }

            let allowed_route_indices = allowed_routes
                .iter()
                .filter_map(|route_id| {
                    let route = route_index.get(route_id).copied();
                    if route.is_none() {
                        warn!(
                            vehicle_type = %type_name,
                            route_id = %route_id,
                            "Allowed route does not name a route candidate, ignoring"
                        );
                    }
                    route
                })
                .collect::<FxHashSet<_>>();

            vehicle_type_index.insert(type_name.clone(), type_idx);
            vehicle_types.push(VehicleType {
                type_name,
                vehicle_ids: ids.ids,
                allowed_routes,
                allowed_route_indices,
            });
        }

        for type_name in route_allowances.keys() {
            warn!(
                vehicle_type = %type_name,
                "Route allowances given for an unknown vehicle type, ignoring"
            );
        }

        let mut vehicles = Vec::with_capacity(vehicle_type_of.len());
        for (vehicle_id, vehicle_type) in parameters.sets.buses.into_iter().zip(vehicle_type_of) {
            let Some(vehicle_type) = vehicle_type else {
                return Err(ProblemError::UntypedVehicle(vehicle_id));
            };
            vehicles.push(Vehicle {
                external_id: vehicle_id,
                vehicle_type,
            });
        }

        let precomputed_permissions =
            ProblemSpecification::precompute_permissions(&vehicles, &vehicle_types, routes.len());

        Ok(ProblemSpecification {
            id: Uuid::new_v4(),
            created_at: Timestamp::now(),
            general,
            terminals,
            vehicles,
            routes,
            terminal_capacities: terminal_capacity,
            vehicle_types,
            route_index,
            terminal_index,
            vehicle_index,
            vehicle_type_index,
            precomputed_permissions,
        })
    }

    pub fn to_document(&self) -> JsonProblemDocument {
        JsonProblemDocument::from_problem(self, self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn general(&self) -> &GeneralParameters {
        &self.general
    }

    pub fn routes(&self) -> &[RouteCandidate] {
        &self.routes
    }

    pub fn route(&self, route: RouteIdx) -> &RouteCandidate {
        &self.routes[route]
    }

    pub fn route_idx(&self, route_id: &str) -> Option<RouteIdx> {
        self.route_index.get(route_id).copied()
    }

    pub fn route_by_id(&self, route_id: &str) -> Option<&RouteCandidate> {
        self.route_idx(route_id).map(|route| &self.routes[route])
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn terminal(&self, terminal: TerminalIdx) -> &Terminal {
        &self.terminals[terminal]
    }

    pub fn terminal_idx(&self, terminal_id: &str) -> Option<TerminalIdx> {
        self.terminal_index.get(terminal_id).copied()
    }

    /// Capacity entries in document order.
    pub fn terminal_capacities(&self) -> &[TerminalCapacity] {
        &self.terminal_capacities
    }

    pub fn terminal_capacity(&self, terminal_id: &str) -> Option<u32> {
        self.terminal_idx(terminal_id)
            .and_then(|terminal| self.terminals[terminal].max_buses())
    }

    pub fn routes_from_terminal(
        &self,
        terminal: TerminalIdx,
    ) -> impl Iterator<Item = (RouteIdx, &RouteCandidate)> {
        self.routes
            .iter()
            .enumerate_idx()
            .filter(move |(_, route): &(RouteIdx, &RouteCandidate)| {
                route.origin_terminal() == terminal
            })
    }

    /// The fleet, in the order of `parameters.sets.buses`.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle]
    }

    pub fn vehicle_idx(&self, vehicle_id: &str) -> Option<VehicleIdx> {
        self.vehicle_index.get(vehicle_id).copied()
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    pub fn vehicle_type(&self, type_name: &str) -> Option<&VehicleType> {
        self.vehicle_type_index
            .get(type_name)
            .map(|vehicle_type| &self.vehicle_types[*vehicle_type])
    }

    pub fn vehicle_type_of(&self, vehicle_id: &str) -> Option<&VehicleType> {
        self.vehicle_idx(vehicle_id)
            .map(|vehicle| &self.vehicle_types[self.vehicles[vehicle].vehicle_type()])
    }

    /// False when the vehicle or route is unknown, or the vehicle's type does
    /// not allow the route.
    pub fn is_vehicle_allowed(&self, vehicle_id: &str, route_id: &str) -> bool {
        match (self.vehicle_idx(vehicle_id), self.route_idx(route_id)) {
            (Some(vehicle), Some(route)) => self.is_allowed(vehicle, route),
            _ => false,
        }
    }

    #[inline]
    pub fn is_allowed(&self, vehicle: VehicleIdx, route: RouteIdx) -> bool {
        self.precomputed_permissions[vehicle.get() * self.routes.len() + route.get()]
    }

    fn precompute_permissions(
        vehicles: &[Vehicle],
        vehicle_types: &[VehicleType],
        num_routes: usize,
    ) -> Vec<bool> {
        let mut permissions = vec![false; vehicles.len() * num_routes];

        for (vehicle_index, vehicle) in vehicles.iter().enumerate() {
            let vehicle_type = &vehicle_types[vehicle.vehicle_type()];
            for route in RouteIdx::range(num_routes) {
                permissions[vehicle_index * num_routes + route.get()] = vehicle_type.allows(route);
            }
        }

        permissions
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils;

    #[test]
    fn test_parse_toy_instance() {
        let problem = test_utils::create_toy_problem();

        assert_eq!(problem.num_routes(), 2);
        assert_eq!(problem.num_vehicles(), 2);
        assert_eq!(problem.general().total_fleet_size, 2);
        assert_eq!(problem.route_by_id("R2").unwrap().fare_ghs(), 3.0);
        assert_eq!(problem.terminal_capacity("T1"), Some(2));
        assert_eq!(problem.terminal_capacity("T9"), None);
        assert!(problem.route_by_id("R3").is_none());
    }

    #[test]
    fn test_is_vehicle_allowed() {
        let mut document = test_utils::toy_document();
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
        let problem = ProblemSpecification::from_json_str(&document.to_string()).unwrap();

        assert!(problem.is_vehicle_allowed("V1", "R1"));
        assert!(problem.is_vehicle_allowed("V1", "R2"));
        assert!(!problem.is_vehicle_allowed("V2", "R1"));
        assert!(problem.is_vehicle_allowed("V2", "R2"));
        assert!(!problem.is_vehicle_allowed("V3", "R1"));
        assert!(!problem.is_vehicle_allowed("V1", "R3"));
        assert_eq!(problem.vehicle_type_of("V2").unwrap().type_name(), "coach");
    }

    #[test]
    fn test_missing_required_field_names_the_field() {
        let mut document = test_utils::toy_document();
        document["routes_definition"][0]
            .as_object_mut()
            .unwrap()
            .remove("fare_ghs");

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(error, ProblemError::Json(_)));
        assert!(error.to_string().contains("fare_ghs"));
    }

    #[test]
    fn test_unknown_top_level_section_is_rejected() {
        let mut document = test_utils::toy_document();
        document["terminal_capacities"] = json!([]);

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(error, ProblemError::Json(_)));
        assert!(error.to_string().contains("terminal_capacities"));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut document = test_utils::toy_document();
        document["parameters"]["general"]["total_fleet_size"] = json!("two");

        assert!(ProblemSpecification::from_json_str(&document.to_string()).is_err());
    }

    #[test]
    fn test_negative_demand_is_rejected() {
        let mut document = test_utils::toy_document();
        document["routes_definition"][1]["demand_per_day"] = json!(-30);

        assert!(ProblemSpecification::from_json_str(&document.to_string()).is_err());
    }

    #[test]
    fn test_unknown_origin_terminal() {
        let mut document = test_utils::toy_document();
        document["routes_definition"][0]["origin_terminal"] = json!("T7");

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert_eq!(
            error.to_string(),
            "route `R1` originates at unknown terminal `T7`"
        );
    }

    #[test]
    fn test_duplicate_route_id() {
        let mut document = test_utils::toy_document();
        document["routes_definition"][1]["route_id"] = json!("R1");

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(
            error,
            ProblemError::DuplicateId { kind: "route", .. }
        ));
    }

    #[test]
    fn test_untyped_vehicle() {
        let mut document = test_utils::toy_document();
        document["vehicle_permissions"]["vehicle_types"]["minibus"]["ids"] = json!(["V1"]);

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert_eq!(error.to_string(), "bus `V2` is not listed by any vehicle type");
    }

    #[test]
    fn test_vehicle_in_two_types() {
        let mut document = test_utils::toy_document();
        document["vehicle_permissions"] = json!({
            "vehicle_types": {
                "coach": { "ids": ["V1"] },
                "minibus": { "ids": ["V1", "V2"] }
            },
            "route_allowances": { "coach": ["R1"], "minibus": ["R1", "R2"] }
        });

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(error, ProblemError::VehicleInMultipleTypes { .. }));
    }

    #[test]
    fn test_vehicle_listed_twice_by_one_type() {
        let mut document = test_utils::toy_document();
        document["vehicle_permissions"]["vehicle_types"]["minibus"]["ids"] =
            json!(["V1", "V1", "V2"]);

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(
            &error,
            ProblemError::DuplicateTypedVehicle { type_name, vehicle_id }
                if type_name == "minibus" && vehicle_id == "V1"
        ));
        assert_eq!(
            error.to_string(),
            "vehicle_permissions.vehicle_types.minibus lists bus `V1` twice"
        );
    }

    #[test]
    fn test_type_with_unknown_vehicle() {
        let mut document = test_utils::toy_document();
        document["vehicle_permissions"]["vehicle_types"]["minibus"]["ids"] =
            json!(["V1", "V2", "V9"]);

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(error, ProblemError::UnknownTypedVehicle { .. }));
    }

    #[test]
    fn test_missing_route_allowances() {
        let mut document = test_utils::toy_document();
        document["vehicle_permissions"]["route_allowances"] = json!({});

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(error, ProblemError::MissingRouteAllowances(name) if name == "minibus"));
    }

    #[test]
    fn test_unknown_allowed_route_is_ignored() {
        let mut document = test_utils::toy_document();
        document["vehicle_permissions"]["route_allowances"]["minibus"] = json!(["R1", "R404"]);

        let problem = ProblemSpecification::from_json_str(&document.to_string()).unwrap();

        assert!(problem.is_vehicle_allowed("V1", "R1"));
        assert!(!problem.is_vehicle_allowed("V1", "R2"));
        assert!(!problem.is_vehicle_allowed("V1", "R404"));
    }

    #[test]
    fn test_capacity_for_unknown_terminal() {
        let mut document = test_utils::toy_document();
        document["terminal_capacity"] = json!([{ "terminal_id": "T2", "max_buses": 1 }]);

        let error = ProblemSpecification::from_json_str(&document.to_string()).unwrap_err();

        assert!(matches!(error, ProblemError::UnknownCapacityTerminal(id) if id == "T2"));
    }

    #[test]
    fn test_routes_from_terminal() {
        let mut document = test_utils::toy_document();
        document["parameters"]["sets"]["terminals"] = json!(["T1", "T2"]);
        document["routes_definition"][1]["origin_terminal"] = json!("T2");
        let problem = ProblemSpecification::from_json_str(&document.to_string()).unwrap();

        let t2 = problem.terminal_idx("T2").unwrap();
        let routes = problem
            .routes_from_terminal(t2)
            .map(|(_, route)| route.route_id())
            .collect::<Vec<_>>();

        assert_eq!(routes, vec!["R2"]);
        assert_eq!(problem.terminal(t2).max_buses(), None);
    }

    #[test]
    fn test_document_round_trip_keeps_instance() {
        let problem = test_utils::create_toy_problem();

        let reparsed = ProblemSpecification::from_document(problem.to_document()).unwrap();

        assert_ne!(reparsed.id(), problem.id());
        assert_eq!(reparsed.general(), problem.general());
        assert_eq!(reparsed.num_routes(), problem.num_routes());
        assert_eq!(
            reparsed.terminal_capacities(),
            problem.terminal_capacities()
        );
        assert!(reparsed.is_vehicle_allowed("V2", "R2"));
    }

    #[test]
    fn test_from_json_file() {
        let problem =
            ProblemSpecification::from_json_file(test_utils::data_fixture_path("toy_two_routes.json"))
                .unwrap();

        assert_eq!(problem.num_routes(), 2);
        assert!(problem.is_vehicle_allowed("V1", "R2"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let error = ProblemSpecification::from_json_file("does/not/exist.json").unwrap_err();

        assert!(matches!(error, ProblemError::Io(_)));
    }
}
