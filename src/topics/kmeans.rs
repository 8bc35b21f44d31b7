//! Seeded k-means over dense vectors
//!
//! Initialization is k-means++ driven by a `ChaCha8Rng`, so identical input
//! and seed always give identical assignments.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::ClusterError;

/// K-means parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub max_iterations: usize,
    /// Stop once no centroid moves further than this (Euclidean)
    pub tolerance: f64,
    pub seed: u64,
}

/// Result of a k-means run
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster index per input point
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    pub converged: bool,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index of the closest centroid; ties go to the lowest index
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    best
}

/// k-means++ seeding
fn init_centroids(points: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        // All weights zero means every point already sits on a centroid
        let idx = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..points.len()),
        };
        centroids.push(points[idx].clone());
    }

    centroids
}

/// Run k-means with k-means++ initialization and Lloyd iterations
///
/// Empty clusters keep their previous centroid.
pub fn kmeans(points: &[Vec<f64>], params: &KMeansParams) -> Result<KMeansResult, ClusterError> {
    let n = points.len();
    if params.k == 0 || params.k > n {
        return Err(ClusterError::InvalidClusterCount {
            k: params.k,
            points: n,
        });
    }

    let dims = points[0].len();
    if dims == 0 || points.iter().any(|p| p.len() != dims) {
        return Err(ClusterError::DegenerateInput(format!(
            "expected {n} vectors of equal non-zero length"
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut centroids = init_centroids(points, params.k, &mut rng);
    let mut assignments = vec![0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        iterations += 1;

        for (slot, point) in assignments.iter_mut().zip(points) {
            *slot = nearest(point, &centroids);
        }

        let mut sums = vec![vec![0.0; dims]; params.k];
        let mut counts = vec![0usize; params.k];
        for (point, &cluster) in points.iter().zip(&assignments) {
            counts[cluster] += 1;
            for (acc, value) in sums[cluster].iter_mut().zip(point) {
                *acc += value;
            }
        }

        let mut shift: f64 = 0.0;
        for (j, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
            if count == 0 {
                continue;
            }
            let updated: Vec<f64> = sum.into_iter().map(|v| v / count as f64).collect();
            shift = shift.max(squared_distance(&updated, &centroids[j]).sqrt());
            centroids[j] = updated;
        }

        if !shift.is_finite() {
            return Err(ClusterError::NonFiniteWeights);
        }
        if shift < params.tolerance {
            converged = true;
            break;
        }
    }

    // Final assignment against the settled centroids
    for (slot, point) in assignments.iter_mut().zip(points) {
        *slot = nearest(point, &centroids);
    }

    debug!(
        k = params.k,
        points = n,
        dims = dims,
        iterations = iterations,
        converged = converged,
        "k-means finished"
    );

    Ok(KMeansResult {
        assignments,
        centroids,
        iterations,
        converged,
    })
}
