//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> fit/search -> residuals -> rankings
//!
//! The front-end can then focus on presentation (printing, plotting, exports).

use log::info;

use crate::domain::{FitConfig, FitResult, PairResidual};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_points};

/// All computed outputs of a single `spiral fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: FitResult,
    pub residuals: Vec<PairResidual>,
    pub worst: Vec<PairResidual>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = load_points(&config.csv_path)?;
    info!(
        "Loaded {} points from '{}' (x=[{:.2}, {:.2}], y=[{:.2}, {:.2}])",
        ingest.rows_used,
        config.csv_path.display(),
        ingest.stats.x_min,
        ingest.stats.x_max,
        ingest.stats.y_min,
        ingest.stats.y_max
    );
    run_fit_with_data(config, ingest)
}

/// Execute the fitting pipeline on already-loaded points.
pub fn run_fit_with_data(config: &FitConfig, ingest: IngestedData) -> Result<RunOutput, AppError> {
    let fit = crate::fit::fit_curve(&ingest.points, &config.curve, &config.bounds, &config.search)?;

    let residuals = crate::report::compute_residuals(&ingest.points, &fit, &config.curve)?;
    let worst = crate::report::rank_worst(&residuals, config.top_n);

    Ok(RunOutput {
        ingest,
        fit,
        residuals,
        worst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveConfig, CurveParams, ParamBounds, SampleConfig, SearchConfig};
    use crate::io::export::write_points;
    use crate::io::ingest::load_points_from_reader;

    #[test]
    fn pipeline_fits_generated_cloud() {
        let points = crate::data::generate_sample(&SampleConfig {
            params: CurveParams::new(0.4, 0.01, 30.0),
            curve: CurveConfig::default(),
            count: 40,
            seed: 1,
            noise_sigma: 0.05,
            shuffle: true,
        })
        .unwrap();
        let mut buf = Vec::new();
        write_points(&mut buf, &points).unwrap();
        let ingest = load_points_from_reader(buf.as_slice()).unwrap();

        let config = FitConfig {
            csv_path: "generated.csv".into(),
            curve: CurveConfig::default(),
            bounds: ParamBounds::default(),
            search: SearchConfig { popsize: 15, max_iter: 400, ..SearchConfig::default() },
            top_n: 3,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            precision: 6,
            export_curve: None,
            export_residuals: None,
        };
        let run = run_fit_with_data(&config, ingest).unwrap();

        assert_eq!(run.residuals.len(), 40);
        assert_eq!(run.worst.len(), 3);
        assert!(run.worst[0].distance >= run.worst[2].distance);
        assert!((run.fit.params.x_offset - 30.0).abs() < 0.5, "{:?}", run.fit.params);
        assert!((run.fit.params.theta - 0.4).abs() < 0.05, "{:?}", run.fit.params);
    }
}
