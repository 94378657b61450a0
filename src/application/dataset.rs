//! Scaling and windowing of the engineered feature series.
//!
//! The scaler is fitted in-sample over every available row, matching the
//! deployed behavior; there is deliberately no train/test leakage handling.

use crate::application::scaling::MinMaxScaler;
use crate::domain::errors::PredictError;
use crate::domain::types::{FeatureRow, FEATURE_COUNT, PRICE_COL};
use ndarray::{s, Array2};

/// Time-ordered training pairs. Each window is `window_size` consecutive
/// scaled rows; its label is the scaled price immediately after. Shuffling,
/// if any, is the trainer's business.
pub struct WindowedDataset {
    pub windows: Vec<Array2<f64>>,
    pub labels: Vec<f64>,
    pub scaler: MinMaxScaler,
}

/// Scaled view of the full series for the serving path.
pub struct ScaledSeries {
    pub scaled: Array2<f64>,
    pub scaler: MinMaxScaler,
}

pub fn feature_matrix(rows: &[FeatureRow]) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows.len(), FEATURE_COUNT));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.to_array().into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    matrix
}

/// Fits the scaler, transforms every row and slices out training pairs.
/// Yields exactly `rows.len() - window_size` pairs.
pub fn build_training_set(
    rows: &[FeatureRow],
    window_size: usize,
) -> Result<WindowedDataset, PredictError> {
    if rows.len() < window_size + 1 {
        return Err(PredictError::InsufficientData {
            rows: rows.len(),
            need: window_size + 1,
        });
    }

    let ScaledSeries { scaled, scaler } = scale_series(rows, window_size)?;

    let mut windows = Vec::with_capacity(rows.len() - window_size);
    let mut labels = Vec::with_capacity(rows.len() - window_size);
    for i in window_size..rows.len() {
        windows.push(scaled.slice(s![i - window_size..i, ..]).to_owned());
        labels.push(scaled[[i, PRICE_COL]]);
    }

    Ok(WindowedDataset {
        windows,
        labels,
        scaler,
    })
}

/// Serving variant: only needs a single full window of history.
pub fn scale_series(rows: &[FeatureRow], window_size: usize) -> Result<ScaledSeries, PredictError> {
    if rows.len() < window_size {
        return Err(PredictError::InsufficientData {
            rows: rows.len(),
            need: window_size,
        });
    }

    let matrix = feature_matrix(rows);
    let scaler = MinMaxScaler::fit(matrix.view())?;
    let scaled = scaler.transform(matrix.view())?;

    Ok(ScaledSeries { scaled, scaler })
}

/// The most recent window of an already scaled series.
pub fn latest_window(scaled: &Array2<f64>, window_size: usize) -> Array2<f64> {
    let n = scaled.nrows();
    scaled.slice(s![n - window_size.., ..]).to_owned()
}
