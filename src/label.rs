use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::info;

use crate::cluster::{cluster_rfm, RiskClusters, DEFAULT_N_CLUSTERS, DEFAULT_RANDOM_SEED};
use crate::error::Result;
use crate::record::{TimestampField, Transaction};
use crate::rfm::{compute_rfm, RfmRow, DEFAULT_RFM_TIMESTAMP};

/// One input row plus its proxy label. The label is `None` only for
/// customers who had no computable RFM row; everyone else gets 0 or 1.
#[derive(Debug, Clone)]
pub struct LabeledTransaction {
    pub transaction: Transaction,
    pub is_high_risk: Option<u8>,
}

/// Knobs for the full labeling flow; the defaults mirror the conventional
/// column bindings and the reproducibility seed.
#[derive(Debug, Clone)]
pub struct LabelConfig {
    pub timestamp_field: TimestampField,
    pub n_clusters: usize,
    pub seed: u64,
    /// Reference date for Recency; `None` means one day past the latest
    /// observed timestamp.
    pub snapshot_date: Option<NaiveDateTime>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            timestamp_field: DEFAULT_RFM_TIMESTAMP,
            n_clusters: DEFAULT_N_CLUSTERS,
            seed: DEFAULT_RANDOM_SEED,
            snapshot_date: None,
        }
    }
}

/// Broadcast the per-customer high-risk flag onto every transaction row.
/// Left-join semantics: rows whose customer is absent from the RFM table
/// keep a missing label rather than a fabricated one.
pub fn assign_labels(
    transactions: &[Transaction],
    rfm: &[RfmRow],
    clusters: &RiskClusters,
) -> Vec<LabeledTransaction> {
    let by_customer: HashMap<&str, u8> = rfm
        .iter()
        .zip(&clusters.assignments)
        .map(|(row, &cluster)| {
            (
                row.customer_id.as_str(),
                u8::from(cluster == clusters.high_risk_cluster),
            )
        })
        .collect();

    transactions
        .iter()
        .map(|tx| LabeledTransaction {
            transaction: tx.clone(),
            is_high_risk: by_customer.get(tx.customer_id.as_str()).copied(),
        })
        .collect()
}

/// RFM -> clustering -> label broadcast, as one operation. Any stage failing
/// aborts the whole thing; no label column is produced on failure.
pub fn add_risk_labels(
    transactions: &[Transaction],
    config: &LabelConfig,
) -> Result<Vec<LabeledTransaction>> {
    let rfm = compute_rfm(transactions, config.timestamp_field, config.snapshot_date)?;
    let clusters = cluster_rfm(&rfm, config.n_clusters, config.seed)?;
    let labeled = assign_labels(transactions, &rfm, &clusters);

    let flagged = labeled
        .iter()
        .filter(|l| l.is_high_risk == Some(1))
        .count();
    info!(
        rows = labeled.len(),
        flagged,
        high_risk_cluster = clusters.high_risk_cluster,
        "proxy labels assigned"
    );
    Ok(labeled)
}
