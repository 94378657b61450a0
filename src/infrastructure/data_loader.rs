//! Price history loading from the delimited data file.
//!
//! Cells that fail to parse are coerced to missing and dropped without
//! comment; only a missing file or an unreadable header is an error. Column
//! names are deployment config since the production file ships localized
//! headers.

use crate::domain::errors::PredictError;
use crate::domain::types::PricePoint;
use anyhow::anyhow;
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn load_price_history(
    path: &Path,
    date_column: &str,
    price_column: &str,
) -> Result<Vec<PricePoint>, PredictError> {
    if !path.exists() {
        return Err(PredictError::MissingData {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let date_idx = column_index(&headers, date_column)?;
    let price_idx = column_index(&headers, price_column)?;

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        let parsed = record
            .get(date_idx)
            .and_then(|cell| NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT).ok())
            .zip(
                record
                    .get(price_idx)
                    .and_then(|cell| cell.trim().parse::<f64>().ok()),
            );

        match parsed {
            Some((date, price)) if price.is_finite() && price > 0.0 => {
                points.push(PricePoint { date, price });
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "dropped malformed rows from {:?}", path);
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, PredictError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| PredictError::Internal(anyhow!("data file has no {name:?} column")))
}
