use std::collections::HashMap;

use ndarray::Array2;
use tracing::info;

use crate::aggregate::CustomerAggregator;
use crate::datetime::decompose;
use crate::error::{Error, Result};
use crate::record::{CategoricalField, TimestampField, Transaction};

const NUMERIC_AGG_NAMES: [&str; 4] = ["Amount_sum", "Amount_mean", "Amount_count", "Amount_std"];
const NUMERIC_PART_NAMES: [&str; 4] = ["hour", "day", "month", "year"];
const N_NUMERIC: usize = 8;

/// Column bindings for the feature pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Timestamp column decomposed into calendar parts.
    pub timestamp_field: TimestampField,
    /// Categorical columns that get most-frequent imputation + one-hot.
    pub categorical_fields: Vec<CategoricalField>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            timestamp_field: TimestampField::TransactionDate,
            categorical_fields: vec![CategoricalField::TransactionType, CategoricalField::Channel],
        }
    }
}

#[derive(Debug, Clone)]
struct NumericStats {
    median: f64,
    mean: f64,
    scale: f64,
}

#[derive(Debug, Clone)]
struct CategoryEncoding {
    field: CategoricalField,
    most_frequent: String,
    /// Sorted fit-time vocabulary; one output column per entry.
    categories: Vec<String>,
}

/// Datetime decomposition -> customer aggregation -> column-wise
/// imputation, standardization and one-hot encoding, with every statistic
/// frozen at fit time. Transform never recomputes from its own input, so it
/// is deterministic and leaks nothing from later data into the parameters.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: PipelineConfig,
    aggregator: CustomerAggregator,
    numeric: Vec<NumericStats>,
    categorical: Vec<CategoryEncoding>,
}

impl FeaturePipeline {
    pub fn fit(transactions: &[Transaction], config: PipelineConfig) -> Result<Self> {
        if transactions.is_empty() {
            return Err(Error::EmptyInput);
        }

        let aggregator = CustomerAggregator::fit(transactions);
        let raw = raw_numeric_rows(transactions, &aggregator, config.timestamp_field);

        let mut numeric = Vec::with_capacity(N_NUMERIC);
        for j in 0..N_NUMERIC {
            let present: Vec<f64> = raw.iter().filter_map(|row| row[j]).collect();
            // A column can be entirely missing (e.g. Amount_std when every
            // customer has a single transaction); keep it with a 0.0 median
            // so the matrix width never depends on the data.
            let median = median_of(&present).unwrap_or(0.0);

            let imputed: Vec<f64> = raw.iter().map(|row| row[j].unwrap_or(median)).collect();
            let n = imputed.len() as f64;
            let mean = imputed.iter().sum::<f64>() / n;
            let variance = imputed.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            numeric.push(NumericStats {
                median,
                mean,
                scale: if std > 0.0 { std } else { 1.0 },
            });
        }

        let mut categorical = Vec::with_capacity(config.categorical_fields.len());
        for &field in &config.categorical_fields {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for tx in transactions {
                if let Some(value) = field.get(tx) {
                    *counts.entry(value).or_insert(0) += 1;
                }
            }
            // Ties on frequency resolve to the lexicographically smallest
            // category; an all-missing column gets an empty sentinel.
            let most_frequent = counts
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(value, _)| value.to_string())
                .unwrap_or_default();

            let mut categories: Vec<String> = counts.keys().map(|v| v.to_string()).collect();
            if counts.is_empty() {
                categories.push(most_frequent.clone());
            }
            categories.sort();
            categorical.push(CategoryEncoding { field, most_frequent, categories });
        }

        let pipeline = FeaturePipeline { config, aggregator, numeric, categorical };
        info!(
            rows = transactions.len(),
            customers = pipeline.aggregator.n_customers(),
            features = pipeline.n_features(),
            "feature pipeline fitted"
        );
        Ok(pipeline)
    }

    pub fn fit_transform(transactions: &[Transaction], config: PipelineConfig) -> Result<(Self, Array2<f64>)> {
        let pipeline = Self::fit(transactions, config)?;
        let matrix = pipeline.transform(transactions)?;
        Ok((pipeline, matrix))
    }

    /// Produce the dense feature matrix, aligned row-for-row with the input.
    /// Missing numerics take the frozen medians, missing categoricals the
    /// frozen most-frequent value, and categories unseen at fit time encode
    /// to an all-zero block rather than erroring.
    pub fn transform(&self, transactions: &[Transaction]) -> Result<Array2<f64>> {
        if transactions.is_empty() {
            return Err(Error::EmptyInput);
        }

        let raw = raw_numeric_rows(transactions, &self.aggregator, self.config.timestamp_field);
        let width = self.n_features();
        let mut matrix = Array2::zeros((transactions.len(), width));

        for (i, tx) in transactions.iter().enumerate() {
            for (j, stats) in self.numeric.iter().enumerate() {
                let value = raw[i][j].unwrap_or(stats.median);
                matrix[[i, j]] = (value - stats.mean) / stats.scale;
            }

            let mut offset = N_NUMERIC;
            for encoding in &self.categorical {
                let value = encoding.field.get(tx).unwrap_or(&encoding.most_frequent);
                if let Ok(pos) = encoding.categories.binary_search_by(|c| c.as_str().cmp(value)) {
                    matrix[[i, offset + pos]] = 1.0;
                }
                offset += encoding.categories.len();
            }
        }

        Ok(matrix)
    }

    pub fn n_features(&self) -> usize {
        N_NUMERIC + self.categorical.iter().map(|e| e.categories.len()).sum::<usize>()
    }

    /// Output column layout, in matrix order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = NUMERIC_AGG_NAMES.iter().map(|n| n.to_string()).collect();
        let ts = self.config.timestamp_field.column_name();
        names.extend(NUMERIC_PART_NAMES.iter().map(|part| format!("{ts}_{part}")));
        for encoding in &self.categorical {
            let col = encoding.field.column_name();
            names.extend(encoding.categories.iter().map(|c| format!("{col}_{c}")));
        }
        names
    }
}

/// The eight raw numeric columns, pre-imputation: four amount aggregates
/// followed by four calendar parts. `None` marks a missing value.
fn raw_numeric_rows(
    transactions: &[Transaction],
    aggregator: &CustomerAggregator,
    timestamp_field: TimestampField,
) -> Vec<[Option<f64>; N_NUMERIC]> {
    let aggregates = aggregator.transform(transactions);
    let parts = decompose(transactions, timestamp_field);

    aggregates
        .into_iter()
        .zip(parts)
        .map(|(agg, dt)| {
            [
                agg.map(|a| a.sum),
                agg.and_then(|a| a.mean),
                agg.map(|a| a.count as f64),
                agg.and_then(|a| a.std),
                dt.hour.map(f64::from),
                dt.day.map(f64::from),
                dt.month.map(f64::from),
                dt.year.map(f64::from),
            ]
        })
        .collect()
}

fn median_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
