//! End-to-end pipeline: data file -> indicators -> windowed dataset ->
//! training -> persisted model -> serving forecasts.

use fairprice::application::dataset::build_training_set;
use fairprice::application::indicators::{compute_features, WARMUP_ROWS};
use fairprice::application::ml::gru::GruRegressor;
use fairprice::application::service::PricingService;
use fairprice::application::trainer::{train, TrainerConfig};
use fairprice::config::Config;
use fairprice::domain::types::{PredictRequest, FEATURE_COUNT};
use fairprice::infrastructure::data_loader::load_price_history;
use fairprice::infrastructure::persistence::ModelStore;
use ndarray::Array1;
use std::io::Write;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fairprice-it-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Strictly increasing series with a clean quarter step, so the minimum
/// retained price is exactly representable and easy to reason about.
fn write_series(dir: &PathBuf, days: usize) -> PathBuf {
    let path = dir.join("data.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "date,price").unwrap();
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..days {
        let date = start + chrono::Duration::days(i as i64);
        writeln!(file, "{date},{}", 100.0 + i as f64 * 0.25).unwrap();
    }
    path
}

#[test]
fn full_pipeline_from_csv_to_forecast() {
    let dir = scratch_dir("full");
    let data_path = write_series(&dir, 90);
    let model_path = dir.join("model.json");

    // Offline half: load, engineer, window, train, persist.
    let points = load_price_history(&data_path, "date", "price").unwrap();
    assert_eq!(points.len(), 90);

    let rows = compute_features(&points);
    assert_eq!(rows.len(), 90 - WARMUP_ROWS);

    let dataset = build_training_set(&rows, 30).unwrap();
    assert_eq!(dataset.windows.len(), rows.len() - 30);

    let mut model = GruRegressor::new(FEATURE_COUNT);
    model.dropout_rate = 0.0;
    let report = train(
        &mut model,
        &dataset,
        &TrainerConfig {
            epochs: 5,
            ..TrainerConfig::default()
        },
    );
    assert!(!report.epoch_losses.is_empty());

    ModelStore::new(&model_path).save(&model).unwrap();

    // Online half: the service re-reads everything per request.
    let service = PricingService::new(Config {
        data_path,
        model_path,
        ..Config::default()
    });

    let response = service.price_history().unwrap();
    assert_eq!(response.history.len(), 30);
    assert_eq!(response.predictions.len(), 3);

    let last_history_day = response.history.last().unwrap().day;
    for (i, forecast) in response.predictions.iter().enumerate() {
        assert_eq!(
            forecast.day,
            last_history_day + chrono::Duration::days(i as i64 + 1)
        );
        assert!(forecast.price.is_finite());
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn predict_reports_already_fair_at_the_blended_price() {
    let dir = scratch_dir("fair");
    let data_path = write_series(&dir, 90);
    let model_path = dir.join("model.json");

    // A zeroed head always predicts scaled 0.0, which inverts to the
    // minimum retained price: 100 + WARMUP_ROWS * 0.25 = 106.25.
    let mut model = GruRegressor::new(FEATURE_COUNT);
    model.set_head(Array1::zeros(model.hidden_size()), 0.0);
    ModelStore::new(&model_path).save(&model).unwrap();

    let service = PricingService::new(Config {
        data_path,
        model_path,
        ..Config::default()
    });

    let fair = 106.25;
    let response = service
        .predict(&PredictRequest {
            seller_price: fair,
            buyer_price: fair,
        })
        .unwrap();

    assert_eq!(response.fair_price, fair);
    assert_eq!(response.suggestion, "The seller's price is already fair");

    // Above the blend the seller is told to come down.
    let response = service
        .predict(&PredictRequest {
            seller_price: 200.0,
            buyer_price: 100.0,
        })
        .unwrap();
    assert!(response.suggestion.contains("lower"));
    assert!(response.fair_price < 200.0);

    std::fs::remove_dir_all(&dir).ok();
}
