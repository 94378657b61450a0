//! Fairprice server - fair price prediction API
//!
//! Serves the negotiation and price-history endpoints. The model is trained
//! offline by the `train` binary; this process only reads it.
//!
//! # Usage
//! ```sh
//! PORT=5000 cargo run --bin fairprice
//! ```
//!
//! # Environment Variables
//! - `DATA_PATH` - delimited price history (default: data/data.csv)
//! - `MODEL_PATH` - serialized model (default: model/gru_model.json)
//! - `PORT` - listen port on all interfaces (default: 5000)

use anyhow::Result;
use fairprice::config::Config;
use fairprice::interfaces::http::router;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Fairprice Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: data={:?}, model={:?}, window={}",
        config.data_path, config.model_path, config.window_size
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, router(config)).await?;

    Ok(())
}
