use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column layout shared by the scaler, the dataset builder and the model.
/// Order matters: the forecaster writes predictions back into `PRICE_COL`.
pub const FEATURE_COUNT: usize = 6;
pub const PRICE_COL: usize = 0;

/// One observation of the raw series, already validated by the loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A price point enriched with its technical indicators. Only exists for
/// rows with full indicator history; warmup rows never become a FeatureRow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub price: f64,
    pub sma: f64,
    pub ema: f64,
    pub roc: f64,
    pub rsi: f64,
    pub macd: f64,
}

impl FeatureRow {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [self.price, self.sma, self.ema, self.roc, self.rsi, self.macd]
    }
}

/// A single predicted point. Ephemeral: produced per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub day: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub seller_price: f64,
    pub buyer_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub seller_price: f64,
    pub buyer_price: f64,
    pub fair_price: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceHistoryResponse {
    pub history: Vec<Forecast>,
    pub predictions: Vec<Forecast>,
}

/// Round to two decimals, the precision used everywhere on the API surface.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(12.3449), 12.34);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_feature_row_layout() {
        let row = FeatureRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            price: 1.0,
            sma: 2.0,
            ema: 3.0,
            roc: 4.0,
            rsi: 5.0,
            macd: 6.0,
        };
        let arr = row.to_array();
        assert_eq!(arr.len(), FEATURE_COUNT);
        assert_eq!(arr[PRICE_COL], 1.0);
        assert_eq!(arr[5], 6.0);
    }
}
