use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// One raw transaction row. Timestamps stay as raw strings here; parsing is
/// lenient and happens in the datetime module so that a bad value becomes a
/// missing value rather than a deserialization failure.
///
/// Two timestamp columns exist because the feature pipeline and the RFM flow
/// are keyed on different ones by convention: `TransactionDate` feeds the
/// calendar-part features, `TransactionStartTime` feeds Recency.
#[derive(Debug, Deserialize, Clone)]
pub struct Transaction {
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
    #[serde(rename = "CustomerId")]
    pub customer_id: String,
    #[serde(rename = "TransactionDate", default)]
    pub transaction_date: Option<String>,
    #[serde(rename = "TransactionStartTime", default)]
    pub transaction_start_time: Option<String>,
    #[serde(rename = "Amount", default)]
    pub amount: Option<f64>,
    #[serde(rename = "TransactionType", default)]
    pub transaction_type: Option<String>,
    #[serde(rename = "Channel", default)]
    pub channel: Option<String>,
}

/// Selects which of the two timestamp columns an operation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    TransactionDate,
    TransactionStartTime,
}

impl TimestampField {
    pub fn column_name(self) -> &'static str {
        match self {
            TimestampField::TransactionDate => "TransactionDate",
            TimestampField::TransactionStartTime => "TransactionStartTime",
        }
    }

    pub fn get<'a>(self, tx: &'a Transaction) -> Option<&'a str> {
        match self {
            TimestampField::TransactionDate => tx.transaction_date.as_deref(),
            TimestampField::TransactionStartTime => tx.transaction_start_time.as_deref(),
        }
    }
}

/// Selects a categorical column for the one-hot stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    TransactionType,
    Channel,
}

impl CategoricalField {
    pub fn column_name(self) -> &'static str {
        match self {
            CategoricalField::TransactionType => "TransactionType",
            CategoricalField::Channel => "Channel",
        }
    }

    pub fn get<'a>(self, tx: &'a Transaction) -> Option<&'a str> {
        match self {
            CategoricalField::TransactionType => tx.transaction_type.as_deref(),
            CategoricalField::Channel => tx.channel.as_deref(),
        }
    }
}

pub fn read_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let transactions = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<Transaction>, csv::Error>>()?;

    Ok(transactions)
}
