use ndarray::{Array2, Axis};

/// Column-wise standardization with frozen parameters, so the same shift and
/// scale learned on the fit set can be replayed on any matrix and inverted
/// to map cluster centroids back into original units.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    // Population std per column, with zero variance mapped to 1.0 so a
    // constant column passes through unscaled instead of dividing by zero.
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(data: &Array2<f64>) -> Self {
        let n = data.nrows().max(1) as f64;
        let mut means = Vec::with_capacity(data.ncols());
        let mut scales = Vec::with_capacity(data.ncols());

        for column in data.axis_iter(Axis(1)) {
            let mean = column.sum() / n;
            let variance = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            means.push(mean);
            scales.push(if std > 0.0 { std } else { 1.0 });
        }

        StandardScaler { means, scales }
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut out = data.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|x| (x - self.means[j]) / self.scales[j]);
        }
        out
    }

    pub fn inverse_transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut out = data.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|x| x * self.scales[j] + self.means[j]);
        }
        out
    }

    pub fn mean(&self, column: usize) -> f64 {
        self.means[column]
    }

    pub fn scale(&self, column: usize) -> f64 {
        self.scales[column]
    }
}
