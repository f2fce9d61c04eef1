//! k-means over cosine distance.
//!
//! Centroids start as randomly sampled input vectors (not necessarily
//! distinct). Each iteration assigns every vector to the centroid with the
//! smallest `1 - cosine` and moves each centroid to the mean of its members.
//! A centroid that loses all members keeps its previous position.
//!
//! Random initialization means cluster indices are only meaningful within
//! one run. Pass a seed when a run must be reproducible.

use insight_core::config::defaults::DEFAULT_MAX_ITERATIONS;
use insight_core::errors::ClusteringError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::similarity::cosine_distance;

/// k-means configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeans {
    pub k: usize,
    pub max_iterations: usize,
    pub seed: Option<u64>,
}

/// Output of one k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster index per input vector, parallel to the input.
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    pub iterations: usize,
    /// False when `max_iterations` was reached with assignments still moving.
    pub converged: bool,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Fit `vectors`. All vectors must share one length.
    ///
    /// Fewer vectors than `k` puts each vector in its own cluster without
    /// running the algorithm.
    pub fn fit(&self, vectors: &[Vec<f32>]) -> Result<KMeansResult, ClusteringError> {
        let n = vectors.len();
        if n < self.k {
            return Ok(KMeansResult {
                assignments: (0..n).collect(),
                centroids: vectors.to_vec(),
                iterations: 0,
                converged: true,
            });
        }
        if self.k == 0 {
            return Err(ClusteringError::InvalidClusterCount { k: 0 });
        }

        let dim = vectors[0].len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(ClusteringError::DimensionMismatch {
                left: dim,
                right: bad.len(),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut centroids: Vec<Vec<f32>> = (0..self.k)
            .map(|_| vectors[rng.random_range(0..n)].clone())
            .collect();

        // usize::MAX marks "unassigned" so the first pass always counts as a change.
        let mut assignments = vec![usize::MAX; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations.max(1) {
            iterations += 1;

            let mut changed = false;
            for (i, v) in vectors.iter().enumerate() {
                let nearest = nearest_centroid(v, &centroids)?;
                if assignments[i] != nearest {
                    assignments[i] = nearest;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }

            recompute_centroids(vectors, &assignments, &mut centroids, dim);
        }

        Ok(KMeansResult {
            assignments,
            centroids,
            iterations,
            converged,
        })
    }
}

/// Index of the centroid closest to `v`. Ties go to the lowest index.
fn nearest_centroid(v: &[f32], centroids: &[Vec<f32>]) -> Result<usize, ClusteringError> {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (ci, c) in centroids.iter().enumerate() {
        let d = cosine_distance(v, c)?;
        if d < best_distance {
            best_distance = d;
            best = ci;
        }
    }
    Ok(best)
}

fn recompute_centroids(
    vectors: &[Vec<f32>],
    assignments: &[usize],
    centroids: &mut [Vec<f32>],
    dim: usize,
) {
    let k = centroids.len();
    let mut sums = vec![vec![0.0f64; dim]; k];
    let mut counts = vec![0usize; k];
    for (v, &c) in vectors.iter().zip(assignments) {
        counts[c] += 1;
        for (s, x) in sums[c].iter_mut().zip(v) {
            *s += *x as f64;
        }
    }
    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count == 0 {
            continue;
        }
        *centroid = sum.into_iter().map(|s| (s / count as f64) as f32).collect();
    }
}

/// Cluster `vectors` into `k` groups, returning one assignment per vector.
pub fn cluster_embeddings(
    vectors: &[Vec<f32>],
    k: usize,
    max_iterations: usize,
) -> Result<Vec<usize>, ClusteringError> {
    KMeans::new(k)
        .with_max_iterations(max_iterations)
        .fit(vectors)
        .map(|r| r.assignments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 0.05, 0.0],
            vec![0.95, 0.1, 0.0],
            vec![1.0, 0.0, 0.05],
            vec![0.0, 0.05, 1.0],
            vec![0.05, 0.0, 0.9],
            vec![0.0, 0.1, 1.0],
        ]
    }

    #[test]
    fn fewer_vectors_than_k_are_singletons() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(cluster_embeddings(&vectors, 3, 100).unwrap(), vec![0, 1]);
        assert!(cluster_embeddings(&[], 2, 100).unwrap().is_empty());
    }

    #[test]
    fn never_splits_identical_vectors() {
        // Seeds that sample both initial centroids from one group merge
        // everything; no seed may split a group of identical vectors.
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0],
        ];
        for seed in 0..20 {
            let result = KMeans::new(2).with_seed(Some(seed)).fit(&vectors).unwrap();
            let a = &result.assignments;
            assert!(a[0] == a[1] && a[1] == a[2], "seed {seed}: {a:?}");
            assert!(a[3] == a[4] && a[4] == a[5], "seed {seed}: {a:?}");
        }
    }

    #[test]
    fn empty_centroid_keeps_its_position() {
        let vectors = vec![vec![1.0, 0.0], vec![3.0, 0.0], vec![0.0, 2.0]];
        let mut centroids = vec![vec![0.5, 0.5], vec![-1.0, 7.0], vec![0.0, 1.0]];
        recompute_centroids(&vectors, &[0, 0, 2], &mut centroids, 2);
        assert_eq!(centroids[0], vec![2.0, 0.0]);
        assert_eq!(centroids[1], vec![-1.0, 7.0]);
        assert_eq!(centroids[2], vec![0.0, 2.0]);
    }

    #[test]
    fn duplicate_start_leaves_one_centroid_unused() {
        // Every sample is the same vector, so both centroids start on it and
        // ties send every member to centroid 0.
        let vectors = vec![vec![1.0, 0.0]; 4];
        let r = KMeans::new(2).with_seed(Some(11)).fit(&vectors).unwrap();
        assert!(r.assignments.iter().all(|&c| c == 0));
        assert_eq!(r.centroids[1], vec![1.0, 0.0]);
        assert!(r.converged);
    }

    #[test]
    fn same_seed_same_result() {
        let a = KMeans::new(2).with_seed(Some(7)).fit(&two_blobs()).unwrap();
        let b = KMeans::new(2).with_seed(Some(7)).fit(&two_blobs()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn terminates_at_max_iterations() {
        let r = KMeans::new(2)
            .with_max_iterations(1)
            .with_seed(Some(3))
            .fit(&two_blobs())
            .unwrap();
        assert_eq!(r.iterations, 1);
        assert!(r.assignments.iter().all(|&c| c < 2));
    }

    #[test]
    fn single_cluster_converges_immediately() {
        let r = KMeans::new(1).with_seed(Some(1)).fit(&two_blobs()).unwrap();
        assert!(r.assignments.iter().all(|&c| c == 0));
        assert!(r.converged);
        assert_eq!(r.iterations, 2);
    }

    #[test]
    fn mixed_dimensions_fail() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        let err = cluster_embeddings(&vectors, 1, 10).unwrap_err();
        assert!(matches!(err, ClusteringError::DimensionMismatch { .. }));
    }

    #[test]
    fn zero_k_with_input_is_invalid() {
        let err = cluster_embeddings(&two_blobs(), 0, 10).unwrap_err();
        assert!(matches!(err, ClusteringError::InvalidClusterCount { k: 0 }));
    }
}
