//! Property tests for vector math, the cluster-count heuristic, and k-means.

use insight_clustering::algorithms::{
    cluster_embeddings, cosine_similarity, determine_optimal_clusters, KMeans,
};
use insight_core::errors::ClusteringError;
use proptest::prelude::*;

fn vector(len: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-10.0f32..10.0, len)
}

fn same_length_pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (1usize..32).prop_flat_map(|len| (vector(len), vector(len)))
}

fn vector_set() -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1usize..8).prop_flat_map(|dim| prop::collection::vec(vector(dim), 0..40))
}

proptest! {
    #[test]
    fn cosine_is_symmetric((a, b) in same_length_pair()) {
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn cosine_with_self_is_one(a in vector(16)) {
        prop_assume!(a.iter().any(|x| x.abs() > 1e-3));
        let s = cosine_similarity(&a, &a).unwrap();
        prop_assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_rejects_unequal_lengths(a in vector(3), b in vector(4)) {
        let is_mismatch = matches!(
            cosine_similarity(&a, &b),
            Err(ClusteringError::DimensionMismatch { left: 3, right: 4 })
        );
        prop_assert!(is_mismatch);
    }

    #[test]
    fn cluster_count_is_bounded_and_monotone(n in 0usize..10_000) {
        let k = determine_optimal_clusters(n);
        prop_assert!((1..=5).contains(&k));
        prop_assert!(determine_optimal_clusters(n + 1) >= k);
    }

    #[test]
    fn kmeans_assigns_every_vector_in_range(vectors in vector_set(), k in 1usize..6, seed in any::<u64>()) {
        let result = KMeans::new(k).with_seed(Some(seed)).fit(&vectors).unwrap();
        prop_assert_eq!(result.assignments.len(), vectors.len());
        let bound = if vectors.len() < k { vectors.len() } else { k };
        prop_assert!(result.assignments.iter().all(|&c| c < bound.max(1)));
        prop_assert!(result.iterations <= 100);
    }

    #[test]
    fn fewer_vectors_than_k_are_identity(vectors in prop::collection::vec(vector(4), 0..5)) {
        let k = vectors.len() + 1;
        let assignments = cluster_embeddings(&vectors, k, 100).unwrap();
        prop_assert_eq!(assignments, (0..vectors.len()).collect::<Vec<_>>());
    }
}
