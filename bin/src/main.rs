//! shipeta CLI - Shipment delivery-time estimation.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::ModelArg;

#[derive(Parser)]
#[command(name = "shipeta")]
#[command(about = "Train and serve shipment delivery-time estimates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model and save the artifact
    Train {
        /// Training data CSV (distance_km,transport_mode,container_type,delivery_days).
        /// Defaults to a synthetic set.
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Number of synthetic examples
        #[arg(long, default_value = "1000")]
        samples: usize,

        /// Seed for synthetic data, the model and the holdout split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Model family
        #[arg(short, long, value_enum, default_value = "forest")]
        model: ModelArg,

        /// Number of trees in the forest
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Maximum tree depth (unlimited if omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Fraction of examples held out for evaluation (0 disables the holdout)
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Artifact path. Defaults to the platform data directory.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the training set to this CSV file
        #[arg(long)]
        export_data: Option<PathBuf>,
    },

    /// Estimate delivery days for one shipment
    Predict {
        /// Distance in kilometers
        #[arg(allow_negative_numbers = true)]
        distance_km: f64,

        /// Transport mode (0 sea, 1 road, 2 air)
        #[arg(allow_negative_numbers = true)]
        transport_mode: i64,

        /// Container size in feet (20 or 40)
        #[arg(allow_negative_numbers = true)]
        container_type: i64,

        /// Artifact path. Defaults to the platform data directory.
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve estimates over HTTP
    Serve {
        /// Artifact path. Defaults to the platform data directory.
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Listen address
        #[arg(short, long, default_value_t = shipeta_lib::DEFAULT_ADDR)]
        addr: SocketAddr,

        /// Reject out-of-domain feature values with 422
        #[arg(long)]
        strict: bool,
    },

    /// Show artifact metadata
    Info {
        /// Artifact path. Defaults to the platform data directory.
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

/// Sets up logging. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Train {
            data,
            samples,
            seed,
            model,
            trees,
            max_depth,
            test_fraction,
            output,
            export_data,
        } => commands::train::train(commands::train::TrainArgs {
            data,
            samples,
            seed,
            model,
            trees,
            max_depth,
            test_fraction,
            output,
            export_data,
            quiet: cli.quiet,
        }),
        Commands::Predict {
            distance_km,
            transport_mode,
            container_type,
            model,
            json,
        } => commands::predict::predict(
            model,
            distance_km,
            transport_mode,
            container_type,
            json,
        ),
        Commands::Serve {
            model,
            addr,
            strict,
        } => commands::serve::serve(model, addr, strict).await,
        Commands::Info { model } => commands::info::show_info(model),
    }
}
