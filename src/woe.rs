//! Optional weight-of-evidence encoding.
//!
//! The encoder is a build-time capability (cargo feature `woe`). When the
//! feature is off, invoking it fails with a distinct configuration error;
//! there is no silent fallback to raw features.

use ndarray::Array2;

use crate::error::{Error, Result};

pub const DEFAULT_N_BINS: usize = 10;

/// What this build can do. Resolve once at startup rather than probing at
/// each call site.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub woe: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Capabilities {
            woe: cfg!(feature = "woe"),
        }
    }

    pub fn require_woe(&self) -> Result<()> {
        if self.woe {
            Ok(())
        } else {
            Err(Error::WoeUnavailable)
        }
    }
}

/// Quantile-binned WoE encoding of every feature column against a binary
/// label. Requires the `woe` feature; otherwise fails fast.
#[cfg(not(feature = "woe"))]
pub fn apply_woe(_features: &Array2<f64>, _labels: &[u8], _n_bins: usize) -> Result<Array2<f64>> {
    Err(Error::WoeUnavailable)
}

#[cfg(feature = "woe")]
pub fn apply_woe(features: &Array2<f64>, labels: &[u8], n_bins: usize) -> Result<Array2<f64>> {
    use ndarray::Axis;

    if features.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    if labels.len() != features.nrows() {
        return Err(Error::LabelMismatch {
            labels: labels.len(),
            rows: features.nrows(),
        });
    }
    let bad_total = labels.iter().filter(|&&l| l != 0).count();
    let good_total = labels.len() - bad_total;
    if bad_total == 0 || good_total == 0 {
        return Err(Error::SingleClassLabels);
    }

    let mut out = features.clone();
    for (j, column) in features.axis_iter(Axis(1)).enumerate() {
        let values: Vec<f64> = column.to_vec();
        let edges = quantile_edges(&values, n_bins);

        // Event/non-event counts per bin, with 0.5 smoothing so an empty
        // class in a bin does not blow up the log.
        let bin_count = edges.len() + 1;
        let mut bad = vec![0.0_f64; bin_count];
        let mut good = vec![0.0_f64; bin_count];
        for (value, &label) in values.iter().zip(labels) {
            let b = bin_index(&edges, *value);
            if label != 0 {
                bad[b] += 1.0;
            } else {
                good[b] += 1.0;
            }
        }

        let woe: Vec<f64> = bad
            .iter()
            .zip(&good)
            .map(|(&b, &g)| {
                let dist_bad = (b + 0.5) / (bad_total as f64 + 0.5);
                let dist_good = (g + 0.5) / (good_total as f64 + 0.5);
                (dist_good / dist_bad).ln()
            })
            .collect();

        for (i, value) in values.iter().enumerate() {
            out[[i, j]] = woe[bin_index(&edges, *value)];
        }
    }

    Ok(out)
}

/// Interior bin edges at the column's quantiles, deduplicated so constant
/// or near-constant columns collapse to fewer bins instead of empty ones.
#[cfg(feature = "woe")]
fn quantile_edges(values: &[f64], n_bins: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut edges = Vec::new();
    for k in 1..n_bins {
        let q = k as f64 / n_bins as f64;
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let edge = sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64);
        if edges.last().map_or(true, |&last| edge > last) {
            edges.push(edge);
        }
    }
    edges
}

#[cfg(feature = "woe")]
fn bin_index(edges: &[f64], value: f64) -> usize {
    edges.iter().take_while(|&&e| value > e).count()
}
