//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - starts logging
//! - runs the fit / generate / check / plot commands
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::info;

use crate::cli::{CheckArgs, Command, CurveArgs, FitArgs, GenerateArgs, PlotArgs};
use crate::domain::{CurveConfig, CurveParams, FitConfig, ParamBounds, SampleConfig, SearchConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `spiral` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; flags and real env vars still apply.
    dotenvy::dotenv().ok();

    // `spiral data.csv` behaves like `spiral fit data.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let _logger = init_logging(&cli.log_level)?;

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Generate(args) => handle_generate(args),
        Command::Check(args) => handle_check(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Start the stderr logger. The handle must stay alive for the run.
fn init_logging(spec: &str) -> Result<LoggerHandle, AppError> {
    Logger::try_with_env_or_str(spec)
        .map_err(|e| AppError::new(2, format!("Invalid log level '{spec}': {e}")))?
        .log_to_stderr()
        .start()
        .map_err(|e| AppError::new(4, format!("Logger initialization failed: {e}")))
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.ingest, &run.fit, &config));

    println!("--- FOR DESMOS ---");
    println!("{}", crate::report::format_desmos(&run.fit.params, &config.curve, config.precision));
    println!("{}\n", crate::report::format_domain(&config.curve));

    if config.top_n > 0 {
        println!("{}", crate::report::format_worst(&run.worst));
    }

    if config.plot {
        let plot = crate::plot::render_fit_plot(
            &run.ingest.points,
            &run.fit,
            &config.curve,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_curve {
        let file = crate::io::curve::build_curve_file(&run.fit, &config.curve, Some(config.csv_path.as_path()));
        crate::io::curve::write_curve_json(path, &file)?;
        info!("Wrote curve JSON to '{}'", path.display());
    }
    if let Some(path) = &config.export_residuals {
        crate::io::export::write_residuals_csv(path, &run.residuals)?;
        info!("Wrote residuals CSV to '{}'", path.display());
    }

    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        params: CurveParams::new(args.theta_deg.to_radians(), args.m, args.x),
        curve: curve_config_from_args(&args.curve),
        count: args.count,
        seed: args.seed,
        noise_sigma: args.noise,
        shuffle: !args.ordered,
    };
    let points = crate::data::generate_sample(&config)?;
    crate::io::export::write_points_csv(&args.out, &points)?;
    info!(
        "Wrote {} points to '{}' (theta={:.6} rad, M={}, X={}, noise={})",
        points.len(),
        args.out.display(),
        config.params.theta,
        config.params.m,
        config.params.x_offset,
        config.noise_sigma
    );
    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<(), AppError> {
    let curve = curve_config_from_args(&args.curve);
    let params = CurveParams::new(args.theta, args.m, args.x);
    let ingest = crate::io::ingest::load_points(&args.csv)?;
    let report = crate::report::check_params(&ingest.points, &params, &curve)?;
    println!("{}", crate::report::format_check(&report, &curve));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    println!("{}", crate::report::format_params(&curve.params));
    println!("{}", crate::plot::render_curve_file_plot(&curve, args.width, args.height));
    Ok(())
}

pub fn curve_config_from_args(args: &CurveArgs) -> CurveConfig {
    CurveConfig {
        y_offset: args.y_offset,
        omega: args.omega,
        t_min: args.t_min,
        t_max: args.t_max,
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        curve: curve_config_from_args(&args.curve),
        bounds: ParamBounds::from_degrees(
            (args.theta_min_deg, args.theta_max_deg),
            (args.m_min, args.m_max),
            (args.x_min, args.x_max),
        ),
        search: SearchConfig {
            seed: args.seed,
            max_iter: args.max_iter,
            popsize: args.popsize,
            tol: args.tol,
            recombination: args.recombination,
            polish: !args.no_polish,
            ..SearchConfig::default()
        },
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        precision: args.precision,
        export_curve: args.export_curve.clone(),
        export_residuals: args.export_residuals.clone(),
    }
}

/// Rewrite argv so a bare CSV path means `fit`.
///
/// Rules:
/// - `spiral`                     -> unchanged (clap prints usage)
/// - `spiral data.csv ...`        -> `spiral fit data.csv ...`
/// - `spiral --help/--version/-h` -> unchanged
/// - `spiral --log-level debug data.csv` -> unchanged (use the explicit form)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_subcommand = matches!(arg1.as_str(), "fit" | "generate" | "check" | "plot" | "help");
    if is_subcommand || arg1.starts_with('-') {
        return argv;
    }

    argv.insert(1, "fit".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_csv_becomes_fit() {
        assert_eq!(
            rewrite_args(argv(&["spiral", "xy_data.csv", "--no-plot"])),
            argv(&["spiral", "fit", "xy_data.csv", "--no-plot"])
        );
    }

    #[test]
    fn subcommands_and_flags_are_untouched() {
        for args in [
            vec!["spiral"],
            vec!["spiral", "--help"],
            vec!["spiral", "plot", "--curve", "c.json"],
            vec!["spiral", "generate", "out.csv"],
        ] {
            assert_eq!(rewrite_args(argv(&args)), argv(&args));
        }
    }

    #[test]
    fn fit_config_converts_theta_bounds_to_radians() {
        let cli = crate::cli::Cli::parse_from(["spiral", "fit", "d.csv", "--no-polish", "--seed", "7"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args);
        assert_eq!(config.bounds, ParamBounds::default());
        assert_eq!(config.search.seed, 7);
        assert!(!config.search.polish);
        assert!(config.plot);
    }
}
