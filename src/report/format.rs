//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{CurveConfig, CurveParams, FitConfig, FitResult, PairResidual};
use crate::io::ingest::IngestedData;
use crate::report::CheckReport;

/// Format the full run summary (dataset stats + search diagnostics + parameters).
pub fn format_fit_summary(ingest: &IngestedData, fit: &FitResult, config: &FitConfig) -> String {
    let mut out = String::new();
    let s = &ingest.stats;

    out.push_str("=== spiral - parametric curve fit ===\n");
    out.push_str(&format!("Input: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Points: n={} (rows read={}, skipped={}) | x=[{:.2}, {:.2}] | y=[{:.2}, {:.2}]\n",
        s.n_points,
        ingest.rows_read,
        ingest.row_errors.len(),
        s.x_min,
        s.x_max,
        s.y_min,
        s.y_max
    ));
    out.push_str(&format!(
        "Curve: y_offset={} omega={} t=[{}, {}]\n",
        config.curve.y_offset, config.curve.omega, config.curve.t_min, config.curve.t_max
    ));
    let b = &config.bounds;
    out.push_str(&format!(
        "Bounds: theta=[{:.4}, {:.4}]rad M=[{}, {}] X=[{}, {}]\n",
        b.theta.0, b.theta.1, b.m.0, b.m.1, b.x_offset.0, b.x_offset.1
    ));

    out.push_str("\nSearch:\n");
    out.push_str(&format!(
        "- converged: {} ({} generations, {} evaluations, seed={})\n",
        fit.converged, fit.generations, fit.evaluations, config.search.seed
    ));
    out.push_str(&format!("- squared error: {:.6}\n", fit.squared_error));
    out.push_str(&format!("- L1 distance  : {:.6}\n", fit.l1_distance));

    out.push_str("\nParameters:\n");
    out.push_str(&format_params(&fit.params));
    out.push('\n');

    out
}

/// `theta` in degrees and radians, `M`, `X`.
pub fn format_params(params: &CurveParams) -> String {
    format!(
        "  theta = {:.6} degrees ({:.6} radians)\n  M     = {:.6}\n  X     = {:.6}\n",
        params.theta_degrees(),
        params.theta,
        params.m,
        params.x_offset
    )
}

/// LaTeX-style expression accepted by Desmos for the fitted curve.
pub fn format_desmos(params: &CurveParams, curve: &CurveConfig, precision: usize) -> String {
    let th = format!("{:.precision$}", params.theta);
    let m = format!("{:.precision$}", params.m);
    let x = format!("{:.precision$}", params.x_offset);
    let w = curve.omega;
    let y0 = curve.y_offset;
    format!(
        "\\left(t*\\cos({th})-e^{{{m}\\left|t\\right|}}\\cdot\\sin({w}t)\\sin({th})\\ +{x},\
         {y0}+\\ t*\\sin({th})+e^{{{m}\\left|t\\right|}}\\cdot\\sin({w}t)\\cos({th})\\right)"
    )
}

/// Domain note printed next to the Desmos expression.
pub fn format_domain(curve: &CurveConfig) -> String {
    format!("use domain: {} <= t <= {}", curve.t_min, curve.t_max)
}

/// Table of the worst-matched pairs.
pub fn format_worst(rows: &[PairResidual]) -> String {
    let mut out = String::new();
    out.push_str("Largest residuals (x-rank pairing):\n");
    out.push_str(
        format!(
            "{:>6} {:>12} {:>12} {:>12} {:>12} {:>10}",
            "rank", "x_obs", "y_obs", "x_fit", "y_fit", "distance"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<12} {:-<12} {:-<12} {:-<12} {:-<10}", "", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>10.4}",
                r.rank, r.observed.x, r.observed.y, r.fitted.x, r.fitted.y, r.distance
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Output of `spiral check`.
pub fn format_check(report: &CheckReport, curve: &CurveConfig) -> String {
    let mut out = String::new();
    let c = &report.curve_extent;
    let d = &report.data_extent;

    out.push_str("=== spiral - parameter check ===\n");
    out.push_str(&format_params(&report.params));
    out.push_str(&format!("t range: {} to {}\n", curve.t_min, curve.t_max));
    out.push_str(&format!("calculated x range: {:.2} to {:.2}\n", c.x_min, c.x_max));
    out.push_str(&format!("calculated y range: {:.2} to {:.2}\n", c.y_min, c.y_max));
    out.push_str(&format!("actual data x range: {:.2} to {:.2}\n", d.x_min, d.x_max));
    out.push_str(&format!("actual data y range: {:.2} to {:.2}\n", d.y_min, d.y_max));

    out.push_str("\nChecking specific t values:\n");
    for (t, p) in &report.probes {
        out.push_str(&format!("  t={t:>2}: x={:.2}, y={:.2}\n", p.x, p.y));
    }

    out.push_str(&format!("\nsquared error: {:.6}\n", report.squared_error));
    out.push_str(&format!("L1 distance  : {:.6}\n", report.l1_distance));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatasetStats, Point};

    #[test]
    fn desmos_expression_matches_rubric_layout() {
        let params = CurveParams::new(0.525193, 0.02988, 55.013785);
        let s = format_desmos(&params, &CurveConfig::default(), 6);
        assert_eq!(
            s,
            "\\left(t*\\cos(0.525193)-e^{0.029880\\left|t\\right|}\\cdot\\sin(0.3t)\\sin(0.525193)\\ +55.013785,\
             42+\\ t*\\sin(0.525193)+e^{0.029880\\left|t\\right|}\\cdot\\sin(0.3t)\\cos(0.525193)\\right)"
        );
    }

    #[test]
    fn domain_note_uses_curve_bounds() {
        assert_eq!(format_domain(&CurveConfig::default()), "use domain: 6 <= t <= 60");
    }

    #[test]
    fn params_show_degrees_and_radians() {
        let s = format_params(&CurveParams::new(std::f64::consts::FRAC_PI_6, 0.0, 1.0));
        assert!(s.contains("theta = 30.000000 degrees (0.523599 radians)"));
    }

    #[test]
    fn check_output_lists_probes() {
        let extent = DatasetStats { n_points: 2, x_min: 0.0, x_max: 1.0, y_min: 2.0, y_max: 3.0 };
        let report = CheckReport {
            params: CurveParams::new(0.1, 0.0, 5.0),
            curve_extent: extent.clone(),
            data_extent: extent,
            probes: vec![(6.0, Point::new(1.234, 5.678))],
            squared_error: 1.0,
            l1_distance: 2.0,
        };
        let s = format_check(&report, &CurveConfig::default());
        assert!(s.contains("  t= 6: x=1.23, y=5.68\n"));
        assert!(s.contains("calculated x range: 0.00 to 1.00"));
    }
}
