use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{compare::CompareArgs, generate::GenerateSubcommands, solve::SolveArgs};

mod compare;
mod engines;
mod generate;
mod output;
mod parsers;
mod solve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the solver engines and whether they are usable
    Engines,
    /// Solves a problem document with one engine
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Solves a problem document with every available engine
    Compare {
        #[command(flatten)]
        args: CompareArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    // .env.local wins since dotenvy never overrides a variable already set
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Engines) => engines::run()?,
        Some(Commands::Solve { args }) => solve::run(args)?,
        Some(Commands::Compare { args }) => compare::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
