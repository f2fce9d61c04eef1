//! Cluster-count heuristic.

use insight_core::constants::MAX_CLUSTERS;

/// Number of clusters for `n` insights.
///
/// A step function that keeps clusters interpretable without a tuning pass:
/// n≤2→1, n≤5→2, n≤10→3, n≤20→4, otherwise `min(5, floor(sqrt(n)))`.
pub fn determine_optimal_clusters(n: usize) -> usize {
    match n {
        0..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        11..=20 => 4,
        _ => MAX_CLUSTERS.min((n as f64).sqrt().floor() as usize),
    }
}
