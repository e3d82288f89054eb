use std::collections::HashMap;

use crate::record::Transaction;

/// Per-customer amount statistics frozen at fit time.
///
/// `mean` is missing when every amount for the customer was missing; `std`
/// is the sample standard deviation and is additionally missing for a
/// single-observation customer. Neither is imputed here; the pipeline's
/// imputation stage owns that decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountAggregates {
    pub sum: f64,
    pub mean: Option<f64>,
    pub count: usize,
    pub std: Option<f64>,
}

/// Group-wise sum/mean/count/std of amount per customer, with left-join
/// transform semantics: customers unseen at fit get `None` rather than
/// being dropped or zero-filled.
#[derive(Debug, Clone, Default)]
pub struct CustomerAggregator {
    stats: HashMap<String, AmountAggregates>,
}

impl CustomerAggregator {
    pub fn fit(transactions: &[Transaction]) -> Self {
        let mut amounts: HashMap<&str, Vec<f64>> = HashMap::new();
        for tx in transactions {
            let entry = amounts.entry(tx.customer_id.as_str()).or_default();
            // Skip-NA aggregation: missing amounts contribute nothing,
            // matching the count/sum/mean/std of the non-missing values.
            if let Some(amount) = tx.amount {
                entry.push(amount);
            }
        }

        let stats = amounts
            .into_iter()
            .map(|(customer_id, values)| {
                let count = values.len();
                let sum: f64 = values.iter().sum();
                let mean = if count > 0 { Some(sum / count as f64) } else { None };
                let std = match (count, mean) {
                    (n, Some(m)) if n > 1 => {
                        let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
                        Some((ss / (n as f64 - 1.0)).sqrt())
                    }
                    _ => None,
                };
                (
                    customer_id.to_string(),
                    AmountAggregates { sum, mean, count, std },
                )
            })
            .collect();

        CustomerAggregator { stats }
    }

    /// Left-join the fitted aggregates onto each row by customer id.
    pub fn transform(&self, transactions: &[Transaction]) -> Vec<Option<AmountAggregates>> {
        transactions
            .iter()
            .map(|tx| self.stats.get(tx.customer_id.as_str()).copied())
            .collect()
    }

    pub fn get(&self, customer_id: &str) -> Option<&AmountAggregates> {
        self.stats.get(customer_id)
    }

    pub fn n_customers(&self) -> usize {
        self.stats.len()
    }
}
