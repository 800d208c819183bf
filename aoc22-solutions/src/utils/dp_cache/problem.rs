//! Trait-based DP problem definition.

/// Dependency structure and combination rule of a DP problem.
///
/// - `I`: index type
/// - `K`: value type stored in the cache
///
/// Puzzle states implement this on a shared reference (`impl DpProblem<usize, u64>
/// for &Filesystem`) so the cache borrows the state for one evaluation.
pub trait DpProblem<I, K> {
    /// Indices that `index` depends on; empty for base cases.
    fn deps(&self, index: &I) -> Vec<I>;

    /// Value of `index` given the values of [`DpProblem::deps`], in the same order.
    fn compute(&self, index: &I, deps: Vec<K>) -> K;
}
