//! Failure-mode annotator for multi-agent solving traces.
//!
//! Reads the evaluation results, dataset, and prediction index of a solving
//! run, classifies every problem's trace against the failure taxonomy, and
//! writes one annotation per problem.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use annotator::exit_codes;
use annotator::io::config::{ConfigOverrides, DEFAULT_CONFIG_PATH};
use annotator::{cli, logging};

#[derive(Parser)]
#[command(
    name = "annotator",
    version,
    about = "Rule-based failure-mode annotation of solving traces"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Annotate every evaluated problem and write the annotation file.
    Annotate {
        /// TOML config file; missing means defaults.
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long)]
        evaluation: Option<PathBuf>,
        #[arg(long)]
        predictions: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Base directory for relative trace paths.
        #[arg(long)]
        traces_root: Option<PathBuf>,
    },
    /// Classify a single trace file and print the analysis.
    Classify {
        trace: PathBuf,
        /// The problem was answered correctly.
        #[arg(long)]
        success: bool,
        #[arg(long, default_value = "")]
        predicted: String,
        /// Accepted answer; repeat for alternatives.
        #[arg(long = "ground-truth")]
        ground_truth: Vec<String>,
    },
    /// Print totals and the failure-mode distribution of an annotation file.
    Report { annotations: PathBuf },
    /// List the failure-mode taxonomy.
    Taxonomy,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Annotate {
            config,
            dataset,
            evaluation,
            predictions,
            output,
            traces_root,
        } => {
            let overrides = ConfigOverrides {
                dataset,
                evaluation,
                predictions,
                output,
                traces_root,
            };
            cli::annotate(&config, &overrides)
        }
        Command::Classify {
            trace,
            success,
            predicted,
            ground_truth,
        } => cli::classify_trace(&trace, success, &predicted, &ground_truth),
        Command::Report { annotations } => cli::report(&annotations),
        Command::Taxonomy => {
            cli::taxonomy();
            Ok(())
        }
    }
}
