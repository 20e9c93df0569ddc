//! s2h - lifestyle stress and disease risk CLI
//!
//! Usage:
//!   s2h train data.csv --model random_forest -o bundle/   # Fit and save a bundle
//!   s2h predict -b bundle/ --sleep 5 --activity low \
//!       --work 11 --social low --bmi 29                   # Classify + guidance
//!   s2h assess --stress high --bmi 31.5 --activity low \
//!       --sleep 4.5                                       # Rules only
//!   s2h info -b bundle/                                   # Bundle metadata
//!
//! Logging goes to stderr and follows `RUST_LOG`; `--verbose` and `--quiet`
//! set the default level.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stress2health::classification::ModelKind;
use stress2health::encoder::Level;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;
mod output;

use commands::{assess, info, predict, train};

/// s2h - lifestyle stress classification and disease risk guidance
///
/// Educational output only, not a medical diagnosis.
#[derive(Parser)]
#[command(name = "s2h")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a stress classifier from a labelled CSV file
    Train {
        /// CSV with sleep_hours, physical_activity, work_hours,
        /// social_interaction and stress_level columns
        #[arg(value_name = "CSV")]
        data: PathBuf,

        /// Strategy: logistic, decision_tree, random_forest or neural
        #[arg(short, long)]
        model: Option<ModelKind>,

        /// Bundle output directory
        #[arg(short, long, default_value = "model")]
        output: PathBuf,

        /// TOML training configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed for the split and the model
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Predict stress for one profile using a saved bundle
    Predict {
        /// Bundle directory
        #[arg(short, long, default_value = "model")]
        bundle: PathBuf,

        /// Hours of sleep per night
        #[arg(long)]
        sleep: f32,

        /// Physical activity: low, medium or high
        #[arg(long)]
        activity: Level,

        /// Work hours per day
        #[arg(long)]
        work: f32,

        /// Social interaction: low, medium or high
        #[arg(long)]
        social: Level,

        /// Body mass index; enables risk assessment and guidance
        #[arg(long)]
        bmi: Option<f32>,

        /// Free-text description of how you feel
        #[arg(long)]
        mood: Option<String>,
    },

    /// Score disease risks for a known stress level
    Assess {
        /// Stress level: low, medium or high
        #[arg(long)]
        stress: Level,

        /// Body mass index
        #[arg(long)]
        bmi: f32,

        /// Physical activity: low, medium or high
        #[arg(long)]
        activity: Level,

        /// Hours of sleep per night
        #[arg(long)]
        sleep: f32,
    },

    /// Show bundle metadata and verify its integrity
    Info {
        /// Bundle directory
        #[arg(short, long, default_value = "model")]
        bundle: PathBuf,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Train {
            data,
            model,
            output,
            config,
            seed,
        } => train::run(
            &train::TrainArgs {
                data: &data,
                output: &output,
                model,
                config: config.as_deref(),
                seed,
            },
            cli.json,
        ),

        Commands::Predict {
            bundle,
            sleep,
            activity,
            work,
            social,
            bmi,
            mood,
        } => predict::run(
            &predict::PredictArgs {
                bundle: &bundle,
                sleep,
                activity,
                work,
                social,
                bmi,
                mood: mood.as_deref(),
            },
            cli.json,
        ),

        Commands::Assess {
            stress,
            bmi,
            activity,
            sleep,
        } => assess::run(stress, bmi, activity, sleep, cli.json),

        Commands::Info { bundle } => info::run(&bundle, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            e.exit_code()
        }
    }
}
