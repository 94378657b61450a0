//! Per-request orchestration of the prediction pipeline.
//!
//! Deliberately stateless: every call re-reads the data file, recomputes
//! indicators and refits the scaler, then loads the model read-only. Nothing
//! is cached across requests, so concurrent calls only share immutable files
//! (see DESIGN.md for the latency trade-off).

use crate::application::dataset::{latest_window, scale_series, ScaledSeries};
use crate::application::forecaster::{fair_price_estimate, forecast_iterative};
use crate::application::indicators::compute_features;
use crate::application::negotiation::suggest;
use crate::application::scaling::MinMaxScaler;
use crate::config::Config;
use crate::domain::errors::PredictError;
use crate::domain::types::{
    round2, FeatureRow, Forecast, PredictRequest, PredictResponse, PriceHistoryResponse,
};
use crate::infrastructure::data_loader::load_price_history;
use crate::infrastructure::persistence::ModelStore;
use chrono::NaiveDate;
use ndarray::Array2;
use tracing::{info, warn};

pub struct PricingService {
    config: Config,
}

struct Prepared {
    rows: Vec<FeatureRow>,
    scaler: MinMaxScaler,
    window: Array2<f64>,
    last_date: NaiveDate,
}

impl PricingService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads the series, derives features and fits the scaler from scratch.
    fn prepare(&self) -> Result<Prepared, PredictError> {
        let points = load_price_history(
            &self.config.data_path,
            &self.config.date_column,
            &self.config.price_column,
        )?;
        let rows = compute_features(&points);
        let ScaledSeries { scaled, scaler } = scale_series(&rows, self.config.window_size)?;

        let window = latest_window(&scaled, self.config.window_size);
        // scale_series already rejected series shorter than one window.
        let last_date = rows
            .last()
            .map(|r| r.date)
            .ok_or_else(|| PredictError::InsufficientData {
                rows: 0,
                need: self.config.window_size,
            })?;

        Ok(Prepared {
            rows,
            scaler,
            window,
            last_date,
        })
    }

    /// Recent history plus the iterative forecast. A missing model is not an
    /// error here: it degrades to an empty forecast list, logged.
    pub fn price_history(&self) -> Result<PriceHistoryResponse, PredictError> {
        let prepared = self.prepare()?;

        let skip = prepared.rows.len().saturating_sub(self.config.history_days);
        let history = prepared.rows[skip..]
            .iter()
            .map(|row| Forecast {
                day: row.date,
                price: round2(row.price),
            })
            .collect();

        let predictions = match ModelStore::new(&self.config.model_path).load()? {
            Some(model) => forecast_iterative(
                &model,
                &prepared.scaler,
                prepared.window,
                prepared.last_date,
                self.config.forecast_days,
            )?,
            None => {
                warn!(
                    "model file {:?} absent, returning empty forecast",
                    self.config.model_path
                );
                Vec::new()
            }
        };

        Ok(PriceHistoryResponse {
            history,
            predictions,
        })
    }

    /// One-step fair price blended with the negotiating parties' prices.
    pub fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, PredictError> {
        let model = ModelStore::new(&self.config.model_path)
            .load()?
            .ok_or_else(|| PredictError::MissingModel {
                path: self.config.model_path.clone(),
            })?;

        let prepared = self.prepare()?;
        let estimate = fair_price_estimate(&model, &prepared.scaler, &prepared.window)?;
        info!(estimate, "fair price estimated");

        let suggestion = suggest(estimate, request.seller_price, request.buyer_price);

        Ok(PredictResponse {
            seller_price: request.seller_price,
            buyer_price: request.buyer_price,
            fair_price: suggestion.blended_fair_price,
            suggestion: suggestion.text,
        })
    }
}
