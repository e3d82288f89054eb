use linfa::prelude::Predict;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::error::{Error, Result};
use crate::rfm::RfmRow;
use crate::scaling::StandardScaler;

pub const DEFAULT_N_CLUSTERS: usize = 3;
pub const DEFAULT_RANDOM_SEED: u64 = 42;

const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

// Centroid column layout, matching the RFM row order fed to the clusterer.
const COL_RECENCY: usize = 0;
const COL_FREQUENCY: usize = 1;
const COL_MONETARY: usize = 2;

/// K-means partition of the customers in RFM space.
#[derive(Debug, Clone)]
pub struct RiskClusters {
    /// Cluster index per customer, aligned with the input RFM table.
    pub assignments: Vec<usize>,
    /// Centroids in standardized space, one row per cluster.
    pub centroids_scaled: Array2<f64>,
    /// The same centroids mapped back to original RFM units.
    pub centroids: Array2<f64>,
    /// Index of the cluster selected as high risk.
    pub high_risk_cluster: usize,
}

/// Standardize the RFM table, partition it into `n_clusters` with seeded
/// k-means, and pick the high-risk cluster from the centroids.
///
/// The seed fixes the centroid initialization, so identical input and seed
/// reproduce identical assignments and the identical high-risk choice.
pub fn cluster_rfm(rfm: &[RfmRow], n_clusters: usize, seed: u64) -> Result<RiskClusters> {
    if rfm.is_empty() {
        return Err(Error::EmptyInput);
    }
    if rfm.len() < n_clusters {
        return Err(Error::TooFewCustomers {
            customers: rfm.len(),
            clusters: n_clusters,
        });
    }

    let mut data = Array2::zeros((rfm.len(), 3));
    for (i, row) in rfm.iter().enumerate() {
        data[[i, COL_RECENCY]] = row.recency;
        data[[i, COL_FREQUENCY]] = row.frequency;
        data[[i, COL_MONETARY]] = row.monetary;
    }

    let scaler = StandardScaler::fit(&data);
    let scaled = scaler.transform(&data);

    let dataset = Dataset::from(scaled);
    let rng = StdRng::seed_from_u64(seed);
    let model = KMeans::params_with(n_clusters, rng, L2Dist)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&dataset)
        .map_err(|e| Error::Clustering(e.to_string()))?;

    let labels = model.predict(&dataset);
    let centroids_scaled = model.centroids().clone();
    let centroids = scaler.inverse_transform(&centroids_scaled);
    let high_risk_cluster = select_high_risk(&centroids);

    info!(
        customers = rfm.len(),
        clusters = n_clusters,
        high_risk_cluster,
        "rfm clustering complete"
    );

    Ok(RiskClusters {
        assignments: labels.iter().copied().collect(),
        centroids_scaled,
        centroids,
        high_risk_cluster,
    })
}

/// Pick the centroid that looks most like disengaged, low-value behavior:
/// lowest composite of rank(Frequency asc) + rank(Monetary asc) +
/// rank(Recency desc). A composite tie goes to the lowest cluster index.
pub fn select_high_risk(centroids: &Array2<f64>) -> usize {
    let recency: Vec<f64> = centroids.column(COL_RECENCY).to_vec();
    let frequency: Vec<f64> = centroids.column(COL_FREQUENCY).to_vec();
    let monetary: Vec<f64> = centroids.column(COL_MONETARY).to_vec();

    let score: Vec<f64> = rank(&frequency, true)
        .into_iter()
        .zip(rank(&monetary, true))
        .zip(rank(&recency, false))
        .map(|((f, m), r)| f + m + r)
        .collect();

    let mut best = 0;
    for (i, s) in score.iter().enumerate() {
        if *s < score[best] {
            best = i;
        }
    }
    best
}

/// Fractional (average) 1-based ranks; tied values share the mean of the
/// positions they occupy.
fn rank(values: &[f64], ascending: bool) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let cmp = values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // Positions start..=end hold equal values; share the average rank.
        let avg = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = avg;
        }
        start = end + 1;
    }
    ranks
}
