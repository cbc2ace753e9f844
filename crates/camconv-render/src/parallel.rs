use rayon::prelude::*;

/// Controls how batched operations are executed.
///
/// Results are always returned in batch order, whatever the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process batch elements in parallel.
    #[default]
    Parallel,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small batches, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,
}

/// Apply `f` to every index in `0..len`, collecting the results in order.
pub fn map_indices<R, F>(strategy: ExecutionStrategy, len: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> R + Send + Sync,
{
    match strategy {
        ExecutionStrategy::Serial => (0..len).map(f).collect(),
        ExecutionStrategy::Parallel => (0..len).into_par_iter().map(f).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_indices_keeps_order() {
        let serial = map_indices(ExecutionStrategy::Serial, 100, |i| i * i);
        let parallel = map_indices(ExecutionStrategy::Parallel, 100, |i| i * i);
        assert_eq!(serial, parallel);
        assert_eq!(serial[9], 81);
    }
}
