//! Feature engineering and proxy risk labeling for transactional customer
//! data.
//!
//! Two independent flows over the same in-memory transaction table:
//! - the feature pipeline (datetime decomposition, per-customer amount
//!   aggregation, imputation/scaling/one-hot) produces a dense numeric
//!   matrix for a downstream scoring model;
//! - the labeling flow (RFM aggregation, standardization, seeded k-means,
//!   centroid ranking) attaches a binary `is_high_risk` proxy label to
//!   every transaction row.
//!
//! Both flows follow a strict fit/transform contract: statistics are frozen
//! against a fit set and replayed verbatim, never recomputed from transform
//! input.

pub mod aggregate;
pub mod cluster;
pub mod datetime;
pub mod error;
pub mod label;
pub mod pipeline;
pub mod record;
pub mod rfm;
pub mod scaling;
pub mod woe;


pub use aggregate::{AmountAggregates, CustomerAggregator};
pub use cluster::{cluster_rfm, RiskClusters, DEFAULT_N_CLUSTERS, DEFAULT_RANDOM_SEED};
pub use datetime::{decompose, parse_timestamp, DatetimeParts};
pub use error::{Error, Result};
pub use label::{add_risk_labels, assign_labels, LabelConfig, LabeledTransaction};
pub use pipeline::{FeaturePipeline, PipelineConfig};
pub use record::{read_transactions, CategoricalField, TimestampField, Transaction};
pub use rfm::{compute_rfm, RfmRow, DEFAULT_RFM_TIMESTAMP};
pub use scaling::StandardScaler;
pub use woe::{apply_woe, Capabilities};
