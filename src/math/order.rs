//! Stable index orderings.

/// Indices of `values` in ascending order.
///
/// `slice::sort_by` is stable, so equal keys keep their original relative
/// order. `total_cmp` gives NaN a fixed place instead of an arbitrary one.
pub fn argsort_by<T, F>(values: &[T], key: F) -> Vec<usize>
where
    F: Fn(&T) -> f64,
{
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| key(&values[a]).total_cmp(&key(&values[b])));
    idx
}

/// Permutation check used by tests and debug assertions.
pub fn is_permutation(idx: &[usize]) -> bool {
    let mut seen = vec![false; idx.len()];
    for &i in idx {
        if i >= seen.len() || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argsort_is_stable_on_ties() {
        let v = [3.0, 1.0, 3.0, 1.0, 2.0];
        assert_eq!(argsort_by(&v, |x| *x), vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn argsort_handles_empty_and_single() {
        let empty: [f64; 0] = [];
        assert!(argsort_by(&empty, |x| *x).is_empty());
        assert_eq!(argsort_by(&[7.0], |x| *x), vec![0]);
    }

    #[test]
    fn permutation_check() {
        assert!(is_permutation(&[2, 0, 1]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 3]));
    }
}
