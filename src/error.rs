use thiserror::Error;

/// Common result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort an operation outright. Row-level data problems
/// (an unparseable timestamp, an unseen category) never show up here;
/// they flow through as missing values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input dataset is empty")]
    EmptyInput,

    #[error("timestamp column `{0}` could not be parsed for any row")]
    UnparseableTimestamps(&'static str),

    #[error("{customers} customers cannot be partitioned into {clusters} clusters")]
    TooFewCustomers { customers: usize, clusters: usize },

    #[error("k-means clustering failed: {0}")]
    Clustering(String),

    #[error("WoE encoding is not available; rebuild with the `woe` feature enabled")]
    WoeUnavailable,

    #[error("WoE labels must contain both classes")]
    SingleClassLabels,

    #[error("label length {labels} does not match feature row count {rows}")]
    LabelMismatch { labels: usize, rows: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
