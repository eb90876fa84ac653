//! Command-line parsing for the parametric curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "spiral", version, about = "Recover (theta, M, X) of a rotated exponential sinusoid from an xy point cloud")]
pub struct Cli {
    /// Log level or flexi_logger spec (e.g. `debug`, `spiral_curves=debug`).
    #[arg(long, global = true, env = "SPIRAL_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the curve to a CSV point cloud and print parameters, scores and a plot.
    Fit(FitArgs),
    /// Write a synthetic point cloud from known parameters.
    Generate(GenerateArgs),
    /// Score given parameters against a CSV point cloud without searching.
    Check(CheckArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Fixed curve constants.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Vertical offset of the curve.
    #[arg(long, default_value_t = 42.0)]
    pub y_offset: f64,

    /// Angular frequency of the sinusoid.
    #[arg(long, default_value_t = 0.3)]
    pub omega: f64,

    /// Start of the curve-parameter domain.
    #[arg(long, default_value_t = 6.0, allow_negative_numbers = true)]
    pub t_min: f64,

    /// End of the curve-parameter domain.
    #[arg(long, default_value_t = 60.0, allow_negative_numbers = true)]
    pub t_max: f64,
}

/// Options for `spiral fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// CSV file with `x` and `y` columns.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub curve: CurveArgs,

    /// Lower bound for theta (degrees).
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub theta_min_deg: f64,

    /// Upper bound for theta (degrees).
    #[arg(long, default_value_t = 49.9, allow_negative_numbers = true)]
    pub theta_max_deg: f64,

    /// Lower bound for M.
    #[arg(long, default_value_t = -0.049, allow_negative_numbers = true)]
    pub m_min: f64,

    /// Upper bound for M.
    #[arg(long, default_value_t = 0.049, allow_negative_numbers = true)]
    pub m_max: f64,

    /// Lower bound for X.
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Upper bound for X.
    #[arg(long, default_value_t = 99.9, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Random seed for the population search.
    #[arg(long, env = "SPIRAL_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Generation ceiling for differential evolution.
    #[arg(long, env = "SPIRAL_MAX_ITER", default_value_t = 1000)]
    pub max_iter: usize,

    /// Population multiplier (population = popsize * 3).
    #[arg(long, env = "SPIRAL_POPSIZE", default_value_t = 30)]
    pub popsize: usize,

    /// Relative convergence tolerance on population energies.
    #[arg(long, default_value_t = 0.01)]
    pub tol: f64,

    /// Crossover probability.
    #[arg(long, default_value_t = 0.7)]
    pub recombination: f64,

    /// Skip the Nelder–Mead polish after the global search.
    #[arg(long)]
    pub no_polish: bool,

    /// Show the N worst-matched pairs.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Decimal places in the Desmos expression.
    #[arg(long, default_value_t = 6)]
    pub precision: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 30)]
    pub height: usize,

    /// Export curve (params + scores + sampled grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Export per-pair residuals to CSV.
    #[arg(long = "export-residuals")]
    pub export_residuals: Option<PathBuf>,
}

/// Options for `spiral generate`.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(value_name = "CSV")]
    pub out: PathBuf,

    /// Rotation angle (degrees).
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    pub theta_deg: f64,

    /// Growth rate M.
    #[arg(long, default_value_t = 0.03, allow_negative_numbers = true)]
    pub m: f64,

    /// Horizontal offset X.
    #[arg(long, default_value_t = 55.0, allow_negative_numbers = true)]
    pub x: f64,

    #[command(flatten)]
    pub curve: CurveArgs,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 1500)]
    pub count: usize,

    /// Gaussian noise standard deviation per coordinate.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for noise and shuffling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Keep points in `t` order instead of shuffling.
    #[arg(long)]
    pub ordered: bool,
}

/// Options for `spiral check`.
#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    /// CSV file with `x` and `y` columns.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Rotation angle (radians).
    #[arg(long, allow_negative_numbers = true)]
    pub theta: f64,

    /// Growth rate M.
    #[arg(long, allow_negative_numbers = true)]
    pub m: f64,

    /// Horizontal offset X.
    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    #[command(flatten)]
    pub curve: CurveArgs,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `spiral fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 30)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_match_reference_setup() {
        let cli = Cli::try_parse_from(["spiral", "fit", "xy_data.csv"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.seed, 42);
        assert_eq!(args.max_iter, 1000);
        assert_eq!(args.popsize, 30);
        assert_eq!(args.m_min, -0.049);
        assert_eq!(args.curve.t_max, 60.0);
        assert!(!args.no_polish);
    }

    #[test]
    fn negative_values_parse() {
        let cli = Cli::try_parse_from(["spiral", "check", "d.csv", "--theta", "0.5", "--m", "-0.02", "--x", "50"]).unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.m, -0.02);
    }
}
