//! Autoregressive multi-step forecasting.
//!
//! Each step feeds the current window to the model, maps the scaled
//! prediction back to price units, then rolls the window forward by dropping
//! the oldest row and appending a synthetic row: a copy of the previous
//! newest row with only the price slot replaced by the prediction. The
//! engineered indicator slots are carried over unchanged for the whole
//! horizon; recomputing them from predicted prices is out of scope on
//! purpose, and downstream checks depend on this exact behavior.

use crate::application::ml::predictor::PricePredictor;
use crate::application::scaling::MinMaxScaler;
use crate::domain::errors::PredictError;
use crate::domain::types::{round2, Forecast, PRICE_COL};
use anyhow::anyhow;
use chrono::{Duration, NaiveDate};
use ndarray::{s, Array1, Array2};

/// Runs the model forward `days` calendar days past `last_date`.
///
/// Pure with respect to its inputs: no file or model state is touched.
/// `days = 0` yields an empty sequence.
pub fn forecast_iterative(
    model: &dyn PricePredictor,
    scaler: &MinMaxScaler,
    mut window: Array2<f64>,
    last_date: NaiveDate,
    days: usize,
) -> Result<Vec<Forecast>, PredictError> {
    let mut forecasts = Vec::with_capacity(days);
    let mut date = last_date;

    for _ in 0..days {
        let scaled_pred = model
            .predict_next(window.view())
            .map_err(|e| anyhow!("model prediction failed: {e}"))?;
        let price = invert_price(scaler, scaled_pred)?;

        date += Duration::days(1);
        forecasts.push(Forecast {
            day: date,
            price: round2(price),
        });

        window = roll_window(&window, scaled_pred);
    }

    Ok(forecasts)
}

/// One-step-ahead fair price: a single model call, inverted to price units.
pub fn fair_price_estimate(
    model: &dyn PricePredictor,
    scaler: &MinMaxScaler,
    window: &Array2<f64>,
) -> Result<f64, PredictError> {
    let scaled_pred = model
        .predict_next(window.view())
        .map_err(|e| anyhow!("model prediction failed: {e}"))?;
    Ok(round2(invert_price(scaler, scaled_pred)?))
}

/// Maps a scaled price back to original units through the fitted scaler.
///
/// The min-max transform is per-column, so only the price column's bounds
/// matter, but the scaler still demands a full-width vector; the remaining
/// slots are zeros and their inverted values are discarded.
fn invert_price(scaler: &MinMaxScaler, scaled_pred: f64) -> Result<f64, PredictError> {
    let mut dummy = Array1::zeros(scaler.n_features());
    dummy[PRICE_COL] = scaled_pred;
    let inverted = scaler.inverse_row(dummy.view())?;
    Ok(inverted[PRICE_COL])
}

/// Drops the oldest row and appends the synthetic next row.
fn roll_window(window: &Array2<f64>, scaled_pred: f64) -> Array2<f64> {
    let rows = window.nrows();
    let mut next = Array2::zeros(window.raw_dim());
    next.slice_mut(s![..rows - 1, ..])
        .assign(&window.slice(s![1.., ..]));

    let mut synthetic = window.row(rows - 1).to_owned();
    synthetic[PRICE_COL] = scaled_pred;
    next.row_mut(rows - 1).assign(&synthetic);
    next
}
