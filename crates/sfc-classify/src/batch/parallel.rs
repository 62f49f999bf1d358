//! Parallel processing utilities for batch classification.
//!
//! Classifying one position never depends on another, so the per-position
//! step can run on rayon when the `parallel` feature is enabled. Sums into
//! matrix cells stay sequential.

use crate::types::ClassifyConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
///
/// Output order always matches input order.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &ClassifyConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(usize, &T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().enumerate().map(|(i, item)| f(i, item)).collect();
        }
    }

    items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_parallel_map_sequential() {
        let config = ClassifyConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let result = maybe_parallel_map(&items, &config, |i, x| (i, x * 2));
        assert_eq!(result, vec![(0, 2), (1, 4), (2, 6), (3, 8), (4, 10)]);
    }

    #[test]
    fn test_maybe_parallel_map_keeps_order() {
        let config = ClassifyConfig::default().with_threshold(10);
        let items: Vec<usize> = (0..1_000).collect();
        let result = maybe_parallel_map(&items, &config, |i, x| i + x);
        assert!(result.iter().enumerate().all(|(i, v)| *v == 2 * i));
    }

    #[test]
    fn test_maybe_parallel_map_empty() {
        let config = ClassifyConfig::default();
        let items: Vec<i32> = vec![];
        let result: Vec<i32> = maybe_parallel_map(&items, &config, |_, x| *x);
        assert!(result.is_empty());
    }
}
