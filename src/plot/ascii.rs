//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line, drawn in `t` order

use crate::domain::{CurveConfig, CurveFile, FitResult, Point};
use crate::math::linspace;
use crate::models::evaluate_many;

/// Render observed points with the fitted curve on top.
pub fn render_fit_plot(points: &[Point], fit: &FitResult, curve: &CurveConfig, width: usize, height: usize) -> String {
    let samples = linspace(curve.t_min, curve.t_max, (width * 4).max(2));
    let curve_points = evaluate_many(&samples, &fit.params, curve);
    render_plot(points, &curve_points, width, height)
}

/// Render a saved curve JSON file (curve only, no overlay points).
pub fn render_curve_file_plot(file: &CurveFile, width: usize, height: usize) -> String {
    let curve_points: Vec<Point> = file
        .grid
        .x
        .iter()
        .zip(file.grid.y.iter())
        .map(|(&x, &y)| Point::new(x, y))
        .collect();
    render_plot(&[], &curve_points, width, height)
}

fn render_plot(points: &[Point], curve_points: &[Point], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let ((x_min, x_max), (y_min, y_max)) = extent(points.iter().chain(curve_points.iter()))
        .unwrap_or(((0.0, 1.0), (0.0, 1.0)));
    let (x_min, x_max) = pad_range(x_min, x_max, 0.02);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let frame = Frame { x_min, x_max, y_min, y_max, width, height };

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first, then let observations overwrite it.
    draw_curve(&mut grid, curve_points, &frame);
    for p in points {
        if let Some((col, row)) = frame.cell(p) {
            grid[row][col] = 'o';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Frame {
    /// Grid cell for a point; `None` for non-finite coordinates.
    fn cell(&self, p: &Point) -> Option<(usize, usize)> {
        if !p.is_finite() {
            return None;
        }
        let u = ((p.x - self.x_min) / (self.x_max - self.x_min)).clamp(0.0, 1.0);
        let v = ((p.y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        let col = (u * (self.width as f64 - 1.0)).round() as usize;
        // y max is row 0
        let row = (self.height as f64 - 1.0 - v * (self.height as f64 - 1.0)).round() as usize;
        Some((col, row))
    }
}

fn extent<'a>(points: impl Iterator<Item = &'a Point>) -> Option<((f64, f64), (f64, f64))> {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points.filter(|p| p.is_finite()) {
        x = (x.0.min(p.x), x.1.max(p.x));
        y = (y.0.min(p.y), y.1.max(p.y));
    }
    if x.0.is_finite() && y.0.is_finite() {
        Some((x, y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(0.5);
    (min - pad, max + pad)
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[Point], frame: &Frame) {
    let mut prev = None;
    for p in curve {
        let Some((col, row)) = frame.cell(p) else {
            prev = None;
            continue;
        };
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveGrid, CurveParams};

    #[test]
    fn plot_golden_snapshot_small() {
        // Horizontal curve from (0, 0) to (9, 0) with one point above it.
        let curve = vec![Point::new(0.0, 0.0), Point::new(9.0, 0.0)];
        let points = vec![Point::new(9.0, 4.0)];
        let txt = render_plot(&points, &curve, 10, 5);
        let expected = concat!(
            "Plot: x=[-0.50, 9.50] | y=[-0.50, 4.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "----------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn fit_plot_has_requested_size() {
        let fit = FitResult {
            params: CurveParams::new(0.5, 0.02, 50.0),
            squared_error: 0.0,
            l1_distance: 0.0,
            converged: true,
            generations: 1,
            evaluations: 1,
            n_points: 1,
        };
        let txt = render_fit_plot(&[Point::new(60.0, 50.0)], &fit, &CurveConfig::default(), 40, 12);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[1..].iter().all(|l| l.chars().count() == 40));
        assert!(txt.contains('o') && txt.contains('-'));
    }

    #[test]
    fn curve_file_plot_ignores_non_finite_grid_points() {
        let file = CurveFile {
            tool: "spiral".to_string(),
            generated: chrono::Utc::now(),
            source: None,
            curve: CurveConfig::default(),
            params: CurveParams::new(0.0, 0.0, 0.0),
            theta_degrees: 0.0,
            fit: FitResult {
                params: CurveParams::new(0.0, 0.0, 0.0),
                squared_error: 0.0,
                l1_distance: 0.0,
                converged: false,
                generations: 0,
                evaluations: 0,
                n_points: 0,
            },
            grid: CurveGrid {
                t: vec![0.0, 1.0, 2.0],
                x: vec![0.0, f64::NAN, 20.0],
                y: vec![0.0, 1.0, 10.0],
            },
        };
        let txt = render_curve_file_plot(&file, 20, 6);
        assert!(txt.starts_with("Plot: x=[-0.50, 20.50]"));
    }
}
