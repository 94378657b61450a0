//! Training loop policy for the GRU regressor.
//!
//! Fixed policy: at most 50 passes over the data in time-ordered
//! mini-batches of 16, Adam at 0.001 minimizing MSE, early stop after 5
//! passes without improvement (restoring the best-seen weights) and a
//! learning-rate halving after 3 passes of plateau. The linear head carries
//! the trainable parameters; the recurrent weights keep their
//! initialization.

use crate::application::dataset::WindowedDataset;
use crate::application::ml::gru::GruRegressor;
use crate::application::ml::optimizer::Adam;
use ndarray::Array1;
use tracing::info;

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub early_stop_patience: usize,
    pub plateau_patience: usize,
    pub plateau_factor: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 16,
            learning_rate: 0.001,
            early_stop_patience: 5,
            plateau_patience: 3,
            plateau_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epoch_losses: Vec<f64>,
    pub best_epoch: usize,
    pub best_loss: f64,
    pub stopped_early: bool,
    pub final_learning_rate: f64,
}

/// Runs the training policy over the dataset, mutating the model in place.
pub fn train(
    model: &mut GruRegressor,
    dataset: &WindowedDataset,
    config: &TrainerConfig,
) -> TrainingReport {
    let n = dataset.windows.len();
    let mut optimizer = Adam::new(config.learning_rate, model.hidden_size());

    let mut epoch_losses = Vec::new();
    let mut best_loss = f64::INFINITY;
    let mut best_epoch = 0;
    let mut best_head = model.head();
    let mut stop_wait = 0usize;
    let mut plateau_wait = 0usize;
    let mut stopped_early = false;

    for epoch in 0..config.epochs {
        let mut epoch_loss = 0.0;
        let mut n_batches = 0usize;

        for batch_start in (0..n).step_by(config.batch_size) {
            let batch_end = (batch_start + config.batch_size).min(n);
            let batch_len = (batch_end - batch_start) as f64;

            let mut grad_w = Array1::zeros(model.hidden_size());
            let mut grad_b = 0.0;
            let mut batch_loss = 0.0;

            for i in batch_start..batch_end {
                let hidden = model.hidden(dataset.windows[i].view());
                let dropped = &hidden * &model.dropout_mask();
                let pred = model.output(&dropped);
                let err = pred - dataset.labels[i];

                batch_loss += err * err;
                grad_w = grad_w + &dropped * (2.0 * err / batch_len);
                grad_b += 2.0 * err / batch_len;
            }

            let (w_out, b_out) = model.head_mut();
            optimizer.step(w_out, b_out, &grad_w, grad_b);

            epoch_loss += batch_loss / batch_len;
            n_batches += 1;
        }

        let avg_loss = epoch_loss / n_batches.max(1) as f64;
        epoch_losses.push(avg_loss);

        if avg_loss < best_loss {
            best_loss = avg_loss;
            best_epoch = epoch;
            best_head = model.head();
            stop_wait = 0;
            plateau_wait = 0;
        } else {
            stop_wait += 1;
            plateau_wait += 1;

            if plateau_wait >= config.plateau_patience {
                let reduced = optimizer.learning_rate() * config.plateau_factor;
                info!(epoch, learning_rate = reduced, "loss plateau, reducing learning rate");
                optimizer.set_learning_rate(reduced);
                plateau_wait = 0;
            }

            if stop_wait >= config.early_stop_patience {
                info!(epoch, best_epoch, best_loss, "early stop, restoring best weights");
                stopped_early = true;
                break;
            }
        }
    }

    if stopped_early {
        let (w, b) = best_head;
        model.set_head(w, b);
    }

    TrainingReport {
        epoch_losses,
        best_epoch,
        best_loss,
        stopped_early,
        final_learning_rate: optimizer.learning_rate(),
    }
}
