use std::path::Path;

use comfy_table::{Table, presets::UTF8_FULL};
use serde::Serialize;
use trotro_optimizer::{
    problem::problem_specification::ProblemSpecification,
    solver::optimization_result::OptimizationResult,
};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn summary_table(engine: &str, result: &OptimizationResult) -> Table {
    let mut table = table(vec!["Engine", "Status", "Objective", "Routes", "Buses", "Seconds"]);
    table.add_row(vec![
        engine.to_owned(),
        result.solver_status.to_string(),
        format!("{:.2}", result.objective_value),
        result.selected_routes.len().to_string(),
        result.num_assigned_vehicles().to_string(),
        format!("{:.3}", result.solve_time),
    ]);
    table.add_row(vec![
        String::from("Revenue (GHS/day)"),
        format!("{:.2}", result.total_revenue),
        String::from("Travel time (min/day)"),
        format!("{:.0}", result.total_travel_time),
        String::new(),
        String::new(),
    ]);
    table
}

pub fn routes_table(problem: &ProblemSpecification, result: &OptimizationResult) -> Table {
    let mut table = table(vec![
        "Route", "Buses", "Bus ids", "Km", "Minutes", "Fare", "Demand", "Revenue",
    ]);

    for statistics in result.route_statistics(problem) {
        table.add_row(vec![
            statistics.route_id,
            statistics.buses_assigned.to_string(),
            statistics.bus_ids.join(", "),
            format!("{:.1}", statistics.distance_km),
            format!("{:.0}", statistics.time_min),
            format!("{:.2}", statistics.fare_ghs),
            statistics.demand_per_day.to_string(),
            format!("{:.2}", statistics.daily_revenue),
        ]);
    }

    table
}

pub fn assignments_table(result: &OptimizationResult) -> Table {
    let mut table = table(vec!["Vehicle", "Route"]);
    for (vehicle_id, route_id) in &result.vehicle_assignments {
        table.add_row(vec![vehicle_id.as_str(), route_id.as_str()]);
    }
    table
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), anyhow::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
