//! Per-column min-max scaling.
//!
//! Fitted over the full available matrix at prediction time; the fitted
//! bounds are kept so a scaled prediction can be mapped back to price units.
//! Serde-serializable so a deployment can persist the fit next to the model
//! and replay it instead of refitting (see DESIGN.md).

use anyhow::{ensure, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl MinMaxScaler {
    /// Fits column bounds over every row of `data`.
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self> {
        ensure!(data.nrows() > 0, "cannot fit scaler on an empty matrix");

        let mut mins = vec![f64::INFINITY; data.ncols()];
        let mut maxs = vec![f64::NEG_INFINITY; data.ncols()];
        for row in data.rows() {
            for (col, &value) in row.iter().enumerate() {
                mins[col] = mins[col].min(value);
                maxs[col] = maxs[col].max(value);
            }
        }
        Ok(Self { mins, maxs })
    }

    pub fn n_features(&self) -> usize {
        self.mins.len()
    }

    fn range(&self, col: usize) -> f64 {
        self.maxs[col] - self.mins[col]
    }

    /// Maps each column into [0, 1]. Constant columns map to 0.0.
    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        ensure!(
            data.ncols() == self.n_features(),
            "scaler fitted on {} columns, got {}",
            self.n_features(),
            data.ncols()
        );

        let mut scaled = data.to_owned();
        for mut row in scaled.rows_mut() {
            for (col, value) in row.iter_mut().enumerate() {
                let range = self.range(col);
                *value = if range == 0.0 {
                    0.0
                } else {
                    (*value - self.mins[col]) / range
                };
            }
        }
        Ok(scaled)
    }

    /// Inverts a single full-width scaled row back to original units.
    pub fn inverse_row(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        ensure!(
            row.len() == self.n_features(),
            "scaler fitted on {} columns, got {}",
            self.n_features(),
            row.len()
        );

        let mut out = row.to_owned();
        for (col, value) in out.iter_mut().enumerate() {
            *value = *value * self.range(col) + self.mins[col];
        }
        Ok(out)
    }

    /// Fitted bounds of the price column, used by hand-computed checks.
    pub fn column_bounds(&self, col: usize) -> (f64, f64) {
        (self.mins[col], self.maxs[col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transform_maps_into_unit_interval() {
        let data = array![[1.0, 10.0], [3.0, 20.0], [2.0, 15.0]];
        let scaler = MinMaxScaler::fit(data.view()).unwrap();
        let scaled = scaler.transform(data.view()).unwrap();

        assert_eq!(scaled[[0, 0]], 0.0);
        assert_eq!(scaled[[1, 0]], 1.0);
        assert_eq!(scaled[[2, 1]], 0.5);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let data = array![
            [1.25, -4.0, 100.0],
            [7.5, 3.5, 250.0],
            [3.0, 0.0, 175.5],
            [6.25, -1.5, 300.0]
        ];
        let scaler = MinMaxScaler::fit(data.view()).unwrap();
        let scaled = scaler.transform(data.view()).unwrap();

        for (i, row) in data.rows().into_iter().enumerate() {
            let restored = scaler.inverse_row(scaled.row(i)).unwrap();
            for (orig, back) in row.iter().zip(restored.iter()) {
                assert!((orig - back).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let data = array![[5.0, 1.0], [5.0, 2.0]];
        let scaler = MinMaxScaler::fit(data.view()).unwrap();
        let scaled = scaler.transform(data.view()).unwrap();
        assert_eq!(scaled[[0, 0]], 0.0);
        assert_eq!(scaled[[1, 0]], 0.0);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = MinMaxScaler::fit(data.view()).unwrap();
        let narrow = array![[1.0], [2.0]];
        assert!(scaler.transform(narrow.view()).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = MinMaxScaler::fit(data.view()).unwrap();
        let json = serde_json::to_string(&scaler).unwrap();
        let restored: MinMaxScaler = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.column_bounds(0), (1.0, 3.0));
        assert_eq!(restored.column_bounds(1), (2.0, 4.0));
    }
}
