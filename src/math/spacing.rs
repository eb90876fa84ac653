//! Evenly spaced parameter grids.
//!
//! Matches the usual `linspace` contract: both endpoints are included and a
//! single-point grid is just `[start]`.

/// Generate `n` evenly spaced points between `start` and `end` (inclusive).
///
/// The last point is pinned to `end` exactly so grids built from the same
/// domain agree bit-for-bit at the boundary.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(6.0, 60.0, 50);
        assert_eq!(v.len(), 50);
        assert_eq!(v[0], 6.0);
        assert_eq!(v[49], 60.0);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linspace_degenerate_sizes() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(6.0, 60.0, 1), vec![6.0]);
    }
}
