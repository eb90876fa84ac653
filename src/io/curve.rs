//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - curve constants + fitted parameters (theta in radians and degrees)
//! - the full `FitResult` (scores, convergence, effort)
//! - a precomputed `(t, x, y)` grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveConfig, CurveFile, CurveGrid, FitResult};
use crate::error::AppError;
use crate::math::linspace;
use crate::models::evaluate_many;

/// Points in the exported grid.
pub const GRID_POINTS: usize = 500;

/// Build the in-memory curve file for a fit.
pub fn build_curve_file(fit: &FitResult, curve: &CurveConfig, source: Option<&Path>) -> CurveFile {
    let t = linspace(curve.t_min, curve.t_max, GRID_POINTS);
    let points = evaluate_many(&t, &fit.params, curve);
    CurveFile {
        tool: "spiral".to_string(),
        generated: Utc::now(),
        source: source.map(|p| p.display().to_string()),
        curve: *curve,
        params: fit.params,
        theta_degrees: fit.params.theta_degrees(),
        fit: fit.clone(),
        grid: CurveGrid {
            t,
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
        },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, file_contents: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, file_contents)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CurveParams;

    fn fit() -> FitResult {
        FitResult {
            params: CurveParams::new(0.525193, 0.029880, 55.013785),
            squared_error: 12.5,
            l1_distance: 80.0,
            converged: true,
            generations: 120,
            evaluations: 10_980,
            n_points: 1500,
        }
    }

    #[test]
    fn grid_covers_domain() {
        let file = build_curve_file(&fit(), &CurveConfig::default(), None);
        assert_eq!(file.grid.t.len(), GRID_POINTS);
        assert_eq!(file.grid.t[0], 6.0);
        assert_eq!(file.grid.t[GRID_POINTS - 1], 60.0);
        assert_eq!(file.grid.x.len(), GRID_POINTS);
        assert!((file.theta_degrees - 30.0913).abs() < 1e-3);
    }

    #[test]
    fn json_roundtrip_through_disk() {
        let file = build_curve_file(&fit(), &CurveConfig::default(), Some(Path::new("xy_data.csv")));
        let path = std::env::temp_dir().join(format!("spiral_curve_{}.json", std::process::id()));
        write_curve_json(&path, &file).unwrap();
        let back = read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.fit.generations, 120);
        assert!(back.fit.converged);
        assert!((back.params.theta - 0.525193).abs() < 1e-12);
        assert_eq!(back.grid.y.len(), GRID_POINTS);
        for (a, b) in back.grid.y.iter().zip(file.grid.y.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
        assert_eq!(back.source.as_deref(), Some("xy_data.csv"));
    }
}
