use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::datetime::parse_timestamp;
use crate::error::{Error, Result};
use crate::record::{TimestampField, Transaction};

/// Timestamp column the RFM flow reads unless the caller overrides it.
pub const DEFAULT_RFM_TIMESTAMP: TimestampField = TimestampField::TransactionStartTime;

/// One customer's behavioral summary: days since their latest transaction,
/// how many timestamped transactions they made, and what they spent.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmRow {
    pub customer_id: String,
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

/// Compute one RFM row per customer, ordered by customer id.
///
/// The snapshot date defaults to one day past the latest parseable timestamp,
/// which keeps Recency non-negative. Frequency counts the rows whose
/// timestamp parsed; Monetary sums every non-missing amount the customer has,
/// timestamped or not. A customer with no parseable timestamp at all gets no
/// row here and therefore a missing label downstream.
///
/// Fails fast on an empty input or when not a single row's timestamp parses;
/// individual bad timestamps are absorbed as missing instead.
pub fn compute_rfm(
    transactions: &[Transaction],
    timestamp_field: TimestampField,
    snapshot_date: Option<NaiveDateTime>,
) -> Result<Vec<RfmRow>> {
    if transactions.is_empty() {
        return Err(Error::EmptyInput);
    }

    let parsed: Vec<Option<NaiveDateTime>> = transactions
        .iter()
        .map(|tx| timestamp_field.get(tx).and_then(parse_timestamp))
        .collect();

    let latest = parsed.iter().flatten().max().copied();
    let latest = match latest {
        Some(ts) => ts,
        None => return Err(Error::UnparseableTimestamps(timestamp_field.column_name())),
    };
    let snapshot = snapshot_date.unwrap_or(latest + Duration::days(1));

    #[derive(Default)]
    struct Accumulator {
        last_seen: Option<NaiveDateTime>,
        timestamped: usize,
        monetary: f64,
    }

    // BTreeMap keeps the table ordered by customer id, which fixes the row
    // order the clusterer sees and with it the cluster index assignment.
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for (tx, ts) in transactions.iter().zip(&parsed) {
        let acc = groups.entry(tx.customer_id.as_str()).or_default();
        if let Some(ts) = ts {
            acc.timestamped += 1;
            acc.last_seen = Some(match acc.last_seen {
                Some(prev) => prev.max(*ts),
                None => *ts,
            });
        }
        if let Some(amount) = tx.amount {
            acc.monetary += amount;
        }
    }

    let rows = groups
        .into_iter()
        .filter_map(|(customer_id, acc)| {
            let last_seen = acc.last_seen?;
            Some(RfmRow {
                customer_id: customer_id.to_string(),
                recency: (snapshot - last_seen).num_days() as f64,
                frequency: acc.timestamped as f64,
                monetary: acc.monetary,
            })
        })
        .collect();

    Ok(rows)
}
