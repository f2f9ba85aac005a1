//! footmatch CLI: the main entry point.
//!
//! Commands:
//! - `run`    : Match literature entries to footnotes and write the report
//! - `status` : Show the status snapshot of the current or last run
//! - `init`   : Write a default config and prompt templates
//! - `config` : Print the resolved configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "footmatch",
    about = "footmatch: match bibliography entries to the footnotes that cite them",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./footmatch.toml)
    #[arg(short, long, global = true, env = "FOOTMATCH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match every literature entry against every footnote
    Run {
        /// Literature JSON (overrides input.literature)
        #[arg(long)]
        literature: Option<PathBuf>,

        /// Footnote HTML (overrides input.footnotes)
        #[arg(long)]
        footnotes: Option<PathBuf>,

        /// Report path (overrides output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the status snapshot
    Status,

    /// Write a default config and prompt templates
    Init,

    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            literature,
            footnotes,
            output,
        } => {
            let overrides = commands::run::Overrides {
                literature,
                footnotes,
                output,
            };
            commands::run::run(config_path, overrides, cli.verbose).await?
        }
        Commands::Status => {
            logging::init(cli.verbose, None)?;
            commands::status::run(config_path).await?
        }
        Commands::Init => {
            logging::init(cli.verbose, None)?;
            commands::init::run(config_path).await?
        }
        Commands::Config => {
            logging::init(cli.verbose, None)?;
            commands::config_cmd::show(config_path).await?
        }
    }

    Ok(())
}
