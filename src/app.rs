//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs generation, fitting and aggregation
//! - prints tables and the terminal plot
//! - writes charts, CSV and workbook exports and the optional manifest

use clap::Parser;

use crate::cli::{Command, RunArgs, TablesArgs};
use crate::domain::{ForecastConfig, SearchConfig, SearchMode, default_cities};
use crate::error::AppError;
use crate::io::{RunManifest, export_tables, import_tables, load_profiles, write_manifest};
use crate::report::{format_growth_table, format_run_summary, format_summary_table};

pub mod pipeline;

/// Pixel size of the comparison chart; the monthly chart uses half the height.
const CHART_SIZE: (u32, u32) = (1600, 1200);

/// Entry point for the `crime-forecast` binary.
pub fn run() -> Result<(), AppError> {
    // A bare invocation (or one starting with flags) runs the `run` subcommand.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Tables(args) => handle_tables(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args)?;
    let run = pipeline::run_forecast(&config)?;

    println!("{}", format_run_summary(&run.results, &config));
    println!("{}", format_summary_table(&run.summary.sorted_descending()));
    println!("{}", format_growth_table(&run.growth.sorted_descending()));

    if config.plot {
        let plot = crate::plot::render_forecast_plot(&run.results, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if config.charts {
        match crate::plot::render_charts(&run.results, &config.out_dir, CHART_SIZE) {
            Ok(paths) => {
                for p in paths {
                    log::info!("wrote chart {}", p.display());
                }
            }
            Err(err) => log::warn!("{err}"),
        }
    }

    if config.export {
        let paths = export_tables(&config.out_dir, &run.summary, &run.growth)?;
        let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        println!("Data exported to {}", names.join(", "));
    }

    if let Some(path) = &config.manifest {
        write_manifest(path, &RunManifest::new(&config, &run.results))?;
        log::info!("wrote manifest {}", path.display());
    }

    Ok(())
}

fn handle_tables(args: TablesArgs) -> Result<(), AppError> {
    let (summary, growth) = import_tables(&args.dir)?;
    println!("{}", format_summary_table(&summary.sorted_descending()));
    println!("{}", format_growth_table(&growth.sorted_descending()));
    Ok(())
}

pub fn forecast_config_from_args(args: &RunArgs) -> Result<ForecastConfig, AppError> {
    let cities = match &args.cities {
        Some(path) => load_profiles(path)?,
        None => default_cities(),
    };

    Ok(ForecastConfig {
        cities,
        seed: args.seed,
        search: SearchConfig {
            max_p: args.max_p,
            max_q: args.max_q,
            max_d: args.max_d,
            max_order: args.max_order,
            max_models: args.max_models,
            criterion: args.criterion,
            mode: if args.exhaustive {
                SearchMode::Exhaustive
            } else {
                SearchMode::Stepwise
            },
        },
        out_dir: args.out_dir.clone(),
        charts: !args.no_charts,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export: !args.no_export,
        manifest: args.manifest.clone(),
        ..ForecastConfig::default()
    })
}

/// Rewrite argv so `crime-forecast` defaults to `crime-forecast run`.
///
/// Rules:
/// - `crime-forecast`                    -> `crime-forecast run`
/// - `crime-forecast --seed 7 ...`       -> `crime-forecast run --seed 7 ...`
/// - `crime-forecast --help/--version`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "run" | "tables") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InfoCriterion;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_run() {
        assert_eq!(rewrite_args(argv(&["cf"])), argv(&["cf", "run"]));
        assert_eq!(rewrite_args(argv(&["cf", "--seed", "1"])), argv(&["cf", "run", "--seed", "1"]));
        assert_eq!(rewrite_args(argv(&["cf", "--help"])), argv(&["cf", "--help"]));
        assert_eq!(rewrite_args(argv(&["cf", "tables"])), argv(&["cf", "tables"]));
    }

    #[test]
    fn config_from_args() {
        let cli = crate::cli::Cli::parse_from(["cf", "run", "--exhaustive", "--criterion", "aicc", "--no-plot"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = forecast_config_from_args(&args).unwrap();
        assert_eq!(config.cities.len(), 6);
        assert_eq!(config.search.mode, SearchMode::Exhaustive);
        assert_eq!(config.search.criterion, InfoCriterion::Aicc);
        assert!(!config.plot);
        assert!(config.charts);
        assert_eq!(config.series_len, 36);
        assert_eq!(config.horizon, 12);
    }

    #[test]
    fn missing_cities_file_is_config_error() {
        let cli = crate::cli::Cli::parse_from(["cf", "run", "--cities", "/nonexistent/crime-forecast/cities.json"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(forecast_config_from_args(&args).unwrap_err().exit_code(), 2);
    }
}
