use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::{output, solve::InputArgs};

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Writes the JSON schema of the problem document
    JsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Validates a problem document and writes it back in canonical form
    Document {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = trotro_optimizer::json::schema::generate_json_schema()?;

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&out, schema)?;
            info!("Schema written to {:?}", out);
        }
        GenerateSubcommands::Document { input, out } => {
            let problem = input.load()?;
            info!(
                id = %problem.id(),
                routes = problem.num_routes(),
                vehicles = problem.num_vehicles(),
                "Problem document is valid"
            );

            output::write_json(&out, &problem.to_document())?;
            info!("Document written to {:?}", out);
        }
    }

    Ok(())
}
