//! CSV exports: per-pair residuals and generated point clouds.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts (and, for point clouds, to be read back by `ingest`).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{PairResidual, Point};
use crate::error::AppError;

/// Write per-pair residuals (rank order) to a CSV file.
pub fn write_residuals_csv(path: &Path, residuals: &[PairResidual]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residuals CSV '{}': {e}", path.display())))?;
    write_residuals(file, residuals)
}

pub fn write_residuals<W: Write>(mut out: W, residuals: &[PairResidual]) -> Result<(), AppError> {
    writeln!(out, "rank,x_obs,y_obs,x_fit,y_fit,dx,dy,distance")
        .map_err(|e| AppError::new(2, format!("Failed to write residuals CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            out,
            "{},{:.10},{:.10},{:.10},{:.10},{:.10},{:.10},{:.10}",
            r.rank,
            r.observed.x,
            r.observed.y,
            r.fitted.x,
            r.fitted.y,
            r.observed.x - r.fitted.x,
            r.observed.y - r.fitted.y,
            r.distance,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write residuals CSV row: {e}")))?;
    }
    Ok(())
}

/// Write an `x,y` point cloud to a CSV file.
pub fn write_points_csv(path: &Path, points: &[Point]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create points CSV '{}': {e}", path.display())))?;
    write_points(file, points)
}

pub fn write_points<W: Write>(mut out: W, points: &[Point]) -> Result<(), AppError> {
    writeln!(out, "x,y").map_err(|e| AppError::new(2, format!("Failed to write points CSV header: {e}")))?;
    for p in points {
        // `{}` on f64 is the shortest exact representation, so a reload is lossless.
        writeln!(out, "{},{}", p.x, p.y)
            .map_err(|e| AppError::new(2, format!("Failed to write points CSV row: {e}")))?;
    }
    Ok(())
}
