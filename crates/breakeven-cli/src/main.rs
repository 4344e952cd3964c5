mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analysis::{EvaluateArgs, MixArgs, ReportArgs};
use commands::project::ProjectArgs;

/// Break-even and target-profit calculations
#[derive(Parser)]
#[command(
    name = "bep",
    version,
    about = "Break-even and target-profit calculations",
    long_about = "Derives contribution margin, gross and net break-even, the sales volume \
                  needed for a target profit, the cost breakdown at that volume and the \
                  safety margin, with decimal precision. Saved projects live in a local store."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Directory for saved projects
    #[arg(long, env = "BEP_STORE_DIR", default_value = ".bep", global = true)]
    store: String,

    /// Log debug events to stderr (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate break-even, target sales and safety margin
    Evaluate(EvaluateArgs),
    /// Mix-weighted price and variable cost from a product list
    Mix(MixArgs),
    /// Plain-text summary of an evaluation
    Report(ReportArgs),
    /// Manage saved projects
    Project(ProjectArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::analysis::run_evaluate(args, &cli.store),
        Commands::Mix(args) => commands::analysis::run_mix(args),
        Commands::Report(args) => commands::analysis::run_report(args, &cli.store),
        Commands::Project(args) => commands::project::run_project(args, &cli.store),
        Commands::Version => {
            println!("bep {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
