//! Technical indicator derivation over the raw price series.
//!
//! The feature set is fixed: price, SMA(5), EMA(5), ROC(5), RSI(14) and
//! MACD(12, 26). Indicators are aligned by position with the input and rows
//! lacking full history are dropped, never backfilled; MACD has the longest
//! warmup, so the first `MACD_SLOW - 1` rows of any series are discarded.

use crate::domain::types::{FeatureRow, PricePoint};

pub const SMA_PERIOD: usize = 5;
pub const EMA_SPAN: usize = 5;
pub const ROC_PERIOD: usize = 5;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;

/// Epsilon added to the average loss so a lossless streak cannot divide by
/// zero; it also pins RSI to ~100 in that case instead of NaN.
const RSI_EPSILON: f64 = 1e-6;

/// First index at which every indicator is defined.
pub const WARMUP_ROWS: usize = MACD_SLOW - 1;

/// Derives the full feature set from a chronologically sorted series and
/// drops the warmup rows where any indicator is undefined.
pub fn compute_features(points: &[PricePoint]) -> Vec<FeatureRow> {
    if points.len() <= WARMUP_ROWS {
        return Vec::new();
    }

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();

    let sma = rolling_mean(&prices, SMA_PERIOD);
    let ema = ewm_mean(&prices, EMA_SPAN);
    let roc = rate_of_change(&prices, ROC_PERIOD);
    let rsi = relative_strength(&prices, RSI_PERIOD);

    let ema_fast = ewm_mean(&prices, MACD_FAST);
    let ema_slow = ewm_mean(&prices, MACD_SLOW);

    points
        .iter()
        .enumerate()
        .skip(WARMUP_ROWS)
        .map(|(i, point)| FeatureRow {
            date: point.date,
            price: point.price,
            sma: sma[i].expect("SMA defined past warmup"),
            ema: ema[i],
            roc: roc[i].expect("ROC defined past warmup"),
            rsi: rsi[i].expect("RSI defined past warmup"),
            macd: ema_fast[i] - ema_slow[i],
        })
        .collect()
}

/// Trailing arithmetic mean; undefined until `period` points exist.
fn rolling_mean(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    let mut sum = 0.0;
    for i in 0..prices.len() {
        sum += prices[i];
        if i >= period {
            sum -= prices[i - period];
        }
        if i + 1 >= period {
            out[i] = Some(sum / period as f64);
        }
    }
    out
}

/// Exponentially weighted mean in the adjusted form: each value is a
/// weighted average of the full history with weights (1-alpha)^k, so it is
/// defined from the first point. alpha = 2 / (span + 1).
fn ewm_mean(prices: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(prices.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &price in prices {
        numerator = price + decay * numerator;
        denominator = 1.0 + decay * denominator;
        out.push(numerator / denominator);
    }
    out
}

/// Fractional change vs. the value `period` points earlier.
fn rate_of_change(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| {
            if i >= period {
                Some((prices[i] - prices[i - period]) / prices[i - period])
            } else {
                None
            }
        })
        .collect()
}

/// RSI over trailing means of gains and losses. The first delta only exists
/// at index 1, so the first defined value sits at index `period`.
fn relative_strength(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    if prices.len() < 2 {
        return out;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    for i in period..prices.len() {
        // deltas[j] is the move into prices[j + 1]
        let window = &deltas[i - period..i];
        let avg_gain = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
        let avg_loss = -window.iter().filter(|d| **d < 0.0).sum::<f64>() / period as f64;
        let rs = avg_gain / (avg_loss + RSI_EPSILON);
        out[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                price,
            })
            .collect()
    }

    #[test]
    fn test_warmup_rows_dropped() {
        let points = series(&vec![100.0; 60]);
        let rows = compute_features(&points);
        assert_eq!(rows.len(), 60 - WARMUP_ROWS);
        assert_eq!(rows[0].date, points[WARMUP_ROWS].date);
    }

    #[test]
    fn test_no_undefined_values_in_retained_rows() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let rows = compute_features(&series(&prices));
        assert!(!rows.is_empty());
        for row in rows {
            for value in row.to_array() {
                assert!(value.is_finite(), "undefined indicator in retained row");
            }
        }
    }

    #[test]
    fn test_too_short_series_yields_nothing() {
        let points = series(&vec![100.0; WARMUP_ROWS]);
        assert!(compute_features(&points).is_empty());
    }

    #[test]
    fn test_sma_is_trailing_mean() {
        let prices: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let rows = compute_features(&series(&prices));
        // Row for price 26.0: mean of 22..=26.
        assert!((rows[0].price - 26.0).abs() < 1e-12);
        assert!((rows[0].sma - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_is_fractional_change() {
        let prices: Vec<f64> = (1..=40).map(|i| i as f64 * 2.0).collect();
        let rows = compute_features(&series(&prices));
        // Row i has price 2(i+1); five steps earlier it was 2(i-4).
        let expected = (52.0 - 42.0) / 42.0;
        assert!((rows[0].roc - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_extremes() {
        let rising: Vec<f64> = (1..=40).map(|i| 100.0 + i as f64).collect();
        let rows = compute_features(&series(&rising));
        assert!(rows[0].rsi > 99.9, "lossless series should pin RSI near 100");

        let flat = vec![100.0; 40];
        let rows = compute_features(&series(&flat));
        assert!(rows[0].rsi.abs() < 1e-9, "flat series has zero strength");
    }

    #[test]
    fn test_constant_series_has_zero_macd_and_flat_ema() {
        let rows = compute_features(&series(&vec![42.0; 40]));
        for row in rows {
            assert!((row.ema - 42.0).abs() < 1e-9);
            assert!(row.macd.abs() < 1e-9);
        }
    }
}
