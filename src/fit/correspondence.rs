//! Rank-by-x correspondence between observed and sampled points.
//!
//! Both sets are sorted independently by x (ascending, stable) and the i-th
//! smallest observed point is paired with the i-th smallest sampled point.
//!
//! This is not a geometric match. It is cheap enough to run inside every
//! objective evaluation and is accurate when both curves are close to
//! monotonic in x. Swapping it for nearest-neighbour or bipartite matching
//! changes the optimisation landscape and the fitted result.

use crate::domain::Point;
use crate::error::{FitError, Result};
use crate::math::{argsort_by, is_permutation};

/// Implicit bijection between two equal-size point sets.
///
/// Pair `i` is `(observed[self.observed[i]], sampled[self.sampled[i]])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub observed: Vec<usize>,
    pub sampled: Vec<usize>,
}

impl Pairing {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Iterate over the paired points in rank order.
    pub fn pairs<'a>(
        &'a self,
        observed: &'a [Point],
        sampled: &'a [Point],
    ) -> impl Iterator<Item = (&'a Point, &'a Point)> + 'a {
        self.observed
            .iter()
            .zip(self.sampled.iter())
            .map(move |(&i, &j)| (&observed[i], &sampled[j]))
    }
}

/// Resolve the pairing between `observed` and `sampled`.
///
/// Fails with `LengthMismatch` when the sets differ in size.
pub fn resolve(observed: &[Point], sampled: &[Point]) -> Result<Pairing> {
    if observed.len() != sampled.len() {
        return Err(FitError::LengthMismatch {
            observed: observed.len(),
            sampled: sampled.len(),
        });
    }

    let pairing = Pairing {
        observed: argsort_by(observed, |p| p.x),
        sampled: argsort_by(sampled, |p| p.x),
    };
    debug_assert!(is_permutation(&pairing.observed) && is_permutation(&pairing.sampled));
    Ok(pairing)
}
