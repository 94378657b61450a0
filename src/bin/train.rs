use clap::Parser;
use fairprice::application::dataset::build_training_set;
use fairprice::application::indicators::compute_features;
use fairprice::application::trainer::{train, TrainerConfig};
use fairprice::domain::types::FEATURE_COUNT;
use fairprice::infrastructure::data_loader::load_price_history;
use fairprice::infrastructure::persistence::ModelStore;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the delimited price history
    #[arg(long, default_value = "data/historical_prices.csv")]
    input: PathBuf,

    /// Path to the output model file
    #[arg(long, default_value = "model/gru_model.json")]
    output: PathBuf,

    /// Input window length in rows
    #[arg(long, default_value_t = 30)]
    window_size: usize,

    /// Maximum number of training passes
    #[arg(long, default_value_t = 50)]
    epochs: usize,

    /// Header of the date column
    #[arg(long, default_value = "date")]
    date_column: String,

    /// Header of the price column
    #[arg(long, default_value = "price")]
    price_column: String,

    /// Start from a fresh model even if one is persisted
    #[arg(long)]
    fresh: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();

    println!("Loading price history from {:?}", args.input);
    let points = load_price_history(&args.input, &args.date_column, &args.price_column)?;
    println!("  {} valid rows", points.len());

    let rows = compute_features(&points);
    println!("  {} rows after indicator warmup", rows.len());

    let dataset = build_training_set(&rows, args.window_size)?;
    println!(
        "  {} training pairs (window {} x {} features)",
        dataset.windows.len(),
        args.window_size,
        FEATURE_COUNT
    );

    let store = ModelStore::new(&args.output);
    let mut model = if args.fresh {
        println!("Initializing fresh model");
        fairprice::application::ml::gru::GruRegressor::new(FEATURE_COUNT)
    } else {
        let source = store.resume_or_init(FEATURE_COUNT);
        println!(
            "{}",
            if source.is_resumed() {
                "Resuming persisted model"
            } else {
                "No usable persisted model, initializing fresh"
            }
        );
        source.into_model()
    };

    let config = TrainerConfig {
        epochs: args.epochs,
        ..TrainerConfig::default()
    };

    println!(
        "Training: up to {} epochs, batch size {}, lr {}",
        config.epochs, config.batch_size, config.learning_rate
    );
    let report = train(&mut model, &dataset, &config);

    println!(
        "Done after {} epochs: best loss {:.6} at epoch {}{}",
        report.epoch_losses.len(),
        report.best_loss,
        report.best_epoch + 1,
        if report.stopped_early {
            " (early stop, best weights restored)"
        } else {
            ""
        }
    );
    println!("Final learning rate: {}", report.final_learning_rate);

    store.save(&model)?;
    println!("Model saved to {:?}", args.output);
    Ok(())
}
