use std::{path::PathBuf, sync::Arc};

use clap::Args;
use trotro_optimizer::{
    formulation::objective_weights::ObjectiveWeights,
    problem::problem_specification::ProblemSpecification,
    solver::{
        engine_params::{EngineOption, EngineParams},
        solve::solve_bus_optimization,
    },
};
use tracing::info;

use crate::{output, parsers};

#[derive(Args)]
pub struct InputArgs {
    /// Problem document (JSON)
    #[arg(short, long, env = "TROTRO_PROBLEM_FILE")]
    pub input: PathBuf,
}

impl InputArgs {
    pub fn load(&self) -> Result<Arc<ProblemSpecification>, anyhow::Error> {
        info!("Loading problem {:?}", self.input);
        let problem = ProblemSpecification::from_json_file(&self.input)?;
        Ok(Arc::new(problem))
    }
}

#[derive(Args)]
pub struct WeightArgs {
    /// Weight of daily revenue in the objective (default: 1.0)
    #[arg(long)]
    pub revenue_weight: Option<f64>,

    /// Weight of daily passenger travel time in the objective (default: 0.1)
    #[arg(long)]
    pub time_weight: Option<f64>,
}

impl WeightArgs {
    pub fn objective_weights(&self) -> ObjectiveWeights {
        let defaults = ObjectiveWeights::default();
        ObjectiveWeights {
            revenue: self.revenue_weight.unwrap_or(defaults.revenue),
            time: self.time_weight.unwrap_or(defaults.time),
        }
    }
}

#[derive(Args)]
pub struct EngineArgs {
    /// Time limit for the engine (e.g., "30s", "5m", "PT1M" or seconds)
    #[arg(short, long, value_parser = parsers::parse_duration)]
    pub time_limit: Option<jiff::SignedDuration>,

    /// Raw engine option, repeatable (e.g., "presolve=off")
    #[arg(long = "option", value_parser = parsers::parse_engine_option)]
    pub options: Vec<(String, EngineOption)>,

    /// Lets the engine write its own log
    #[arg(short, long)]
    pub verbose: bool,
}

impl EngineArgs {
    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            time_limit: self.time_limit,
            verbose: self.verbose,
            options: self.options.iter().cloned().collect(),
        }
    }
}

#[derive(Args)]
pub struct SolveArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(short, long, default_value = "microlp")]
    engine: String,

    #[command(flatten)]
    weights: WeightArgs,

    #[command(flatten)]
    engine_args: EngineArgs,

    /// Writes the result as JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub fn run(args: SolveArgs) -> Result<(), anyhow::Error> {
    let problem = args.input.load()?;

    let result = solve_bus_optimization(
        problem.clone(),
        &args.engine,
        Some(args.weights.objective_weights()),
        &args.engine_args.engine_params(),
    )?;

    println!("{}", output::summary_table(&args.engine, &result));
    if result.is_success() {
        println!("{}", output::routes_table(&problem, &result));
        println!("{}", output::assignments_table(&result));
    }

    if let Some(out) = args.out {
        output::write_json(&out, &result)?;
        info!("Result written to {:?}", out);
    }

    Ok(())
}
