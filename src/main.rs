// Command-line report for the risk labeling and feature engineering flows:
// loads a transactions CSV, derives proxy labels, then fits the feature
// pipeline and summarizes the resulting model input.
use std::error::Error;

use risk_features::{
    add_risk_labels, read_transactions, Capabilities, FeaturePipeline, LabelConfig, PipelineConfig,
};

const DEFAULT_CSV_PATH: &str = "transactions.csv";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CSV_PATH.to_string());
    let transactions = read_transactions(&path)?;
    if transactions.is_empty() {
        println!("No transactions in {}", path);
        return Ok(());
    }
    println!("Loaded {} transactions from {}", transactions.len(), path);

    // Labeling flow
    let config = LabelConfig::default();
    println!(
        "\nProxy labeling: k-means (k={}, seed={})",
        config.n_clusters, config.seed
    );
    let labeled = add_risk_labels(&transactions, &config)?;

    let flagged = labeled.iter().filter(|l| l.is_high_risk == Some(1)).count();
    let unlabeled = labeled.iter().filter(|l| l.is_high_risk.is_none()).count();
    println!(
        "High-risk rows: {} ({:.1}%)",
        flagged,
        100.0 * flagged as f64 / labeled.len() as f64
    );
    if unlabeled > 0 {
        println!("Rows without a computable RFM label: {}", unlabeled);
    }

    // Feature flow
    let (pipeline, matrix) =
        FeaturePipeline::fit_transform(&transactions, PipelineConfig::default())?;
    println!(
        "\nFeature matrix: {} rows x {} columns",
        matrix.nrows(),
        matrix.ncols()
    );
    for name in pipeline.feature_names() {
        println!("  {}", name);
    }

    let caps = Capabilities::detect();
    println!(
        "\nWoE encoding: {}",
        if caps.woe {
            "available"
        } else {
            "unavailable (build with --features woe)"
        }
    );

    Ok(())
}
