//! Command-line parsing for the crime forecaster.
//!
//! Argument parsing and command dispatch stay separate from the modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_SEED, InfoCriterion};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "crime-forecast",
    version,
    about = "Synthetic monthly crime series, auto-ARIMA forecasts and growth per city"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate series, forecast every city, print tables and write charts/exports.
    Run(RunArgs),
    /// Print the tables from previously exported CSV files.
    Tables(TablesArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Seed for the synthetic data generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// JSON file with city profiles (defaults to the built-in six cities).
    #[arg(long, value_name = "JSON")]
    pub cities: Option<PathBuf>,

    /// Information criterion used to rank candidate models.
    #[arg(long, value_enum, default_value_t = InfoCriterion::Aic)]
    pub criterion: InfoCriterion,

    /// Fit every admissible order instead of the stepwise search.
    #[arg(long)]
    pub exhaustive: bool,

    /// Maximum AR order.
    #[arg(long, default_value_t = 5)]
    pub max_p: usize,

    /// Maximum MA order.
    #[arg(long, default_value_t = 5)]
    pub max_q: usize,

    /// Maximum differencing order.
    #[arg(long, default_value_t = 2)]
    pub max_d: usize,

    /// Maximum p + q.
    #[arg(long, default_value_t = 5)]
    pub max_order: usize,

    /// Maximum number of candidate fits per city.
    #[arg(long, default_value_t = 94)]
    pub max_models: usize,

    /// Directory for charts and CSV exports.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip the SVG charts.
    #[arg(long)]
    pub no_charts: bool,

    /// Skip the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Skip the CSV exports.
    #[arg(long)]
    pub no_export: bool,

    /// Terminal plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Terminal plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write a JSON run manifest to this path.
    #[arg(long, value_name = "JSON")]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct TablesArgs {
    /// Directory holding `predicted_crimes.csv` and `predicted_growth.csv`.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}
