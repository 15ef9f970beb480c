use serde::Serialize;

use crate::{define_index_newtype, problem::terminal::TerminalIdx};

use super::problem_error::ProblemError;

define_index_newtype!(RouteIdx, RouteCandidate);

/// A candidate bus route. Demand, distance, time and fare are forecast
/// upstream and taken as given.
#[derive(Serialize, Debug, Clone)]
pub struct RouteCandidate {
    pub(crate) route_id: String,
    pub(crate) origin_terminal: TerminalIdx,
    pub(crate) stops: Vec<String>,
    pub(crate) distance_km: f64,
    pub(crate) time_min: f64,
    pub(crate) fare_ghs: f64,
    pub(crate) demand_per_day: u32,
}

impl RouteCandidate {
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn origin_terminal(&self) -> TerminalIdx {
        self.origin_terminal
    }

    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn time_min(&self) -> f64 {
        self.time_min
    }

    pub fn fare_ghs(&self) -> f64 {
        self.fare_ghs
    }

    pub fn demand_per_day(&self) -> u32 {
        self.demand_per_day
    }

    /// Fare revenue if the whole daily demand is served.
    #[inline]
    pub fn daily_revenue(&self) -> f64 {
        f64::from(self.demand_per_day) * self.fare_ghs
    }

    /// Passenger-minutes spent on the route per day.
    #[inline]
    pub fn daily_travel_time(&self) -> f64 {
        f64::from(self.demand_per_day) * self.time_min
    }

    pub(crate) fn validate(&self) -> Result<(), ProblemError> {
        let metrics = [
            ("distance_km", self.distance_km),
            ("time_min", self.time_min),
            ("fare_ghs", self.fare_ghs),
        ];

        for (field, value) in metrics {
            if !value.is_finite() || value < 0.0 {
                return Err(ProblemError::InvalidRouteMetric {
                    route_id: self.route_id.clone(),
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(fare_ghs: f64, time_min: f64, demand_per_day: u32) -> RouteCandidate {
        RouteCandidate {
            route_id: String::from("R1"),
            origin_terminal: TerminalIdx::new(0),
            stops: vec![String::from("S1"), String::from("S2")],
            distance_km: 5.0,
            time_min,
            fare_ghs,
            demand_per_day,
        }
    }

    #[test]
    fn test_daily_aggregates() {
        let route = route(2.0, 10.0, 50);

        assert_eq!(route.daily_revenue(), 100.0);
        assert_eq!(route.daily_travel_time(), 500.0);
    }

    #[test]
    fn test_negative_fare_is_rejected() {
        let error = route(-1.0, 10.0, 50).validate().unwrap_err();

        assert_eq!(
            error.to_string(),
            "routes_definition[R1].fare_ghs: must be a non-negative number, got -1"
        );
    }

    #[test]
    fn test_nan_time_is_rejected() {
        assert!(route(2.0, f64::NAN, 50).validate().is_err());
    }
}
