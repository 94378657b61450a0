use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Immutable runtime configuration. Built once at startup and passed by
/// reference into each component; nothing reads the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    /// Delimited price history read by the serving endpoints.
    pub data_path: PathBuf,
    /// Serialized GRU model, overwritten by each training run.
    pub model_path: PathBuf,
    /// Length of the input window fed to the model.
    pub window_size: usize,
    /// Calendar days forecast by /price-history.
    pub forecast_days: usize,
    /// Raw rows echoed back as history by /price-history.
    pub history_days: usize,
    /// Port the HTTP server binds on 0.0.0.0.
    pub port: u16,
    /// Localized column headers of the data file.
    pub date_column: String,
    pub price_column: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_path =
            PathBuf::from(env::var("DATA_PATH").unwrap_or_else(|_| "data/data.csv".to_string()));
        let model_path = PathBuf::from(
            env::var("MODEL_PATH").unwrap_or_else(|_| "model/gru_model.json".to_string()),
        );

        let window_size = env::var("WINDOW_SIZE")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<usize>()
            .context("Failed to parse WINDOW_SIZE")?;

        let forecast_days = env::var("FORECAST_DAYS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<usize>()
            .context("Failed to parse FORECAST_DAYS")?;

        let history_days = env::var("HISTORY_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<usize>()
            .context("Failed to parse HISTORY_DAYS")?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("Failed to parse PORT")?;

        let date_column = env::var("DATE_COLUMN").unwrap_or_else(|_| "date".to_string());
        let price_column = env::var("PRICE_COLUMN").unwrap_or_else(|_| "price".to_string());

        anyhow::ensure!(window_size >= 2, "WINDOW_SIZE must be at least 2");

        Ok(Self {
            data_path,
            model_path,
            window_size,
            forecast_days,
            history_days,
            port,
            date_column,
            price_column,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/data.csv"),
            model_path: PathBuf::from("model/gru_model.json"),
            window_size: 30,
            forecast_days: 3,
            history_days: 30,
            port: 5000,
            date_column: "date".to_string(),
            price_column: "price".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_deployment() {
        let config = Config::default();
        assert_eq!(config.window_size, 30);
        assert_eq!(config.forecast_days, 3);
        assert_eq!(config.history_days, 30);
        assert_eq!(config.port, 5000);
    }
}
