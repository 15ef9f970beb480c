use std::{collections::BTreeMap, path::PathBuf};

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use rayon::prelude::*;
use serde::Serialize;
use trotro_optimizer::{
    formulation::objective_weights::ObjectiveWeights,
    solver::{
        optimization_result::OptimizationResult, solver_adapter::SolverAdapter,
        solver_registry::SolverRegistry,
    },
};
use tracing::{info, warn};

use crate::{
    output,
    solve::{EngineArgs, InputArgs, WeightArgs},
};

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    weights: WeightArgs,

    #[command(flatten)]
    engine_args: EngineArgs,

    /// Writes the report as JSON instead of printing it
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum EngineReport {
    Success { data: OptimizationResult },
    Failed { error: String },
}

#[derive(Serialize)]
struct CompareInfo {
    problem_id: String,
    weights: ObjectiveWeights,
    available_engines: Vec<&'static str>,
    timestamp: jiff::Timestamp,
}

#[derive(Serialize)]
struct CompareReport {
    #[serde(flatten)]
    engines: BTreeMap<&'static str, EngineReport>,
    #[serde(rename = "Info")]
    info: CompareInfo,
}

pub fn run(args: CompareArgs) -> Result<(), anyhow::Error> {
    let problem = args.input.load()?;
    let registry = SolverRegistry::global();
    let weights = args.weights.objective_weights();
    let params = args.engine_args.engine_params();
    let available_engines = registry.names();

    info!(engines = ?available_engines, "Comparing engines");

    let engines = available_engines
        .par_iter()
        .map(|&engine| {
            let report = match registry.create_adapter(engine, problem.clone(), weights) {
                Ok(mut adapter) => EngineReport::Success {
                    data: adapter.solve(&params),
                },
                Err(err) => {
                    warn!(engine, error = %err, "Engine failed");
                    EngineReport::Failed {
                        error: err.to_string(),
                    }
                }
            };
            (engine, report)
        })
        .collect::<BTreeMap<_, _>>();

    println!("{}", comparison_table(&engines));

    let report = CompareReport {
        engines,
        info: CompareInfo {
            problem_id: problem.id().to_string(),
            weights,
            available_engines,
            timestamp: jiff::Timestamp::now(),
        },
    };

    match args.out {
        Some(out) => {
            output::write_json(&out, &report)?;
            info!("Report written to {:?}", out);
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn comparison_table(engines: &BTreeMap<&'static str, EngineReport>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Engine",
        "Status",
        "Objective",
        "Routes",
        "Buses",
        "Seconds",
    ]);

    for (engine, report) in engines {
        match report {
            EngineReport::Success { data } => table.add_row(vec![
                engine.to_string(),
                data.solver_status.to_string(),
                format!("{:.2}", data.objective_value),
                data.selected_routes.join(", "),
                data.num_assigned_vehicles().to_string(),
                format!("{:.3}", data.solve_time),
            ]),
            EngineReport::Failed { error } => table.add_row(vec![
                engine.to_string(),
                String::from("failed"),
                error.clone(),
                String::new(),
                String::new(),
                String::new(),
            ]),
        };
    }

    table
}
