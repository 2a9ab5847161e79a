mod inspect;
mod search;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use search::SearchArgs;

#[derive(Parser)]
#[command(
    name = "chainscope",
    version,
    about = "Suggests method chains that produce a value of a requested type",
    long_about = "Chainscope searches the calls recorded in a code snapshot for chains of \
                  method calls and casts that turn a value already in scope into a value of \
                  the requested type, and ranks them by how convenient they are to insert."
)]
pub struct Cli {
    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find and rank chains producing a target type
    Search(SearchArgs),
    /// Show what a snapshot knows about a type
    Inspect {
        /// Snapshot JSON file
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,
        /// Type to inspect
        #[arg(long = "type", value_name = "TYPE")]
        ty: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = chainscope_core::logging::init_logging("cli", cli.verbose);

    match cli.command {
        Commands::Search(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(search::run(args))
        }
        Commands::Inspect { snapshot, ty } => inspect::run(&snapshot, &ty),
    }
}
