//! GRU regression model.
//!
//! Fixed architecture: a single GRU layer of hidden width 64 emitting only
//! its final hidden state, dropout at 0.2 during training, and one linear
//! output unit producing the scaled next price.

use super::predictor::PricePredictor;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const HIDDEN_SIZE: usize = 64;
pub const DROPOUT_RATE: f64 = 0.2;

/// One GRU cell: update gate, reset gate and candidate state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GruCell {
    pub input_size: usize,
    pub hidden_size: usize,

    // Update gate
    w_iz: Array2<f64>,
    w_hz: Array2<f64>,
    b_z: Array1<f64>,

    // Reset gate
    w_ir: Array2<f64>,
    w_hr: Array2<f64>,
    b_r: Array1<f64>,

    // Candidate hidden state
    w_in: Array2<f64>,
    w_hn: Array2<f64>,
    b_n: Array1<f64>,
}

impl GruCell {
    pub fn new(input_size: usize, hidden_size: usize) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();
        let mut rng = rand::rng();
        let mut init = |rows: usize, cols: usize| {
            Array2::from_shape_fn((rows, cols), |_| rng.random_range(-limit..limit))
        };

        Self {
            input_size,
            hidden_size,
            w_iz: init(hidden_size, input_size),
            w_hz: init(hidden_size, hidden_size),
            b_z: Array1::zeros(hidden_size),
            w_ir: init(hidden_size, input_size),
            w_hr: init(hidden_size, hidden_size),
            b_r: Array1::zeros(hidden_size),
            w_in: init(hidden_size, input_size),
            w_hn: init(hidden_size, hidden_size),
            b_n: Array1::zeros(hidden_size),
        }
    }

    /// One time step: h_t = (1 - z) * n + z * h_{t-1}.
    pub fn step(&self, x: ArrayView1<'_, f64>, h_prev: &Array1<f64>) -> Array1<f64> {
        let z = sigmoid(&(self.w_iz.dot(&x) + self.w_hz.dot(h_prev) + &self.b_z));
        let r = sigmoid(&(self.w_ir.dot(&x) + self.w_hr.dot(h_prev) + &self.b_r));
        let n = tanh(&(self.w_in.dot(&x) + self.w_hn.dot(&(&r * h_prev)) + &self.b_n));

        let keep = z.mapv(|v| 1.0 - v);
        &keep * &n + &z * h_prev
    }

    pub fn init_hidden(&self) -> Array1<f64> {
        Array1::zeros(self.hidden_size)
    }
}

/// GRU layer plus linear head. Dropout is owned here but only applied by the
/// trainer; inference is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GruRegressor {
    cell: GruCell,
    w_out: Array1<f64>,
    b_out: f64,
    pub dropout_rate: f64,
}

impl GruRegressor {
    pub fn new(input_size: usize) -> Self {
        let cell = GruCell::new(input_size, HIDDEN_SIZE);
        let limit = (1.0 / HIDDEN_SIZE as f64).sqrt();
        let mut rng = rand::rng();
        let w_out = Array1::from_shape_fn(HIDDEN_SIZE, |_| rng.random_range(-limit..limit));

        Self {
            cell,
            w_out,
            b_out: 0.0,
            dropout_rate: DROPOUT_RATE,
        }
    }

    pub fn input_size(&self) -> usize {
        self.cell.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.cell.hidden_size
    }

    /// Runs the whole window through the cell and returns the final hidden
    /// state.
    pub fn hidden(&self, window: ArrayView2<'_, f64>) -> Array1<f64> {
        let mut h = self.cell.init_hidden();
        for row in window.rows() {
            h = self.cell.step(row, &h);
        }
        h
    }

    /// Linear head over a hidden state.
    pub fn output(&self, hidden: &Array1<f64>) -> f64 {
        self.w_out.dot(hidden) + self.b_out
    }

    pub fn predict(&self, window: ArrayView2<'_, f64>) -> f64 {
        self.output(&self.hidden(window))
    }

    /// Inverted dropout mask for training: kept units are scaled up so the
    /// expected activation is unchanged.
    pub fn dropout_mask(&self) -> Array1<f64> {
        let mut rng = rand::rng();
        let keep = 1.0 - self.dropout_rate;
        Array1::from_shape_fn(self.hidden_size(), |_| {
            if rng.random::<f64>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        })
    }

    /// Snapshot of the trainable head, used to restore best-seen weights.
    pub fn head(&self) -> (Array1<f64>, f64) {
        (self.w_out.clone(), self.b_out)
    }

    pub fn set_head(&mut self, w_out: Array1<f64>, b_out: f64) {
        self.w_out = w_out;
        self.b_out = b_out;
    }

    pub fn head_mut(&mut self) -> (&mut Array1<f64>, &mut f64) {
        (&mut self.w_out, &mut self.b_out)
    }
}

impl PricePredictor for GruRegressor {
    fn predict_next(&self, window: ArrayView2<'_, f64>) -> Result<f64, String> {
        if window.ncols() != self.input_size() {
            return Err(format!(
                "model expects {} features, window has {}",
                self.input_size(),
                window.ncols()
            ));
        }
        if window.nrows() == 0 {
            return Err("empty window".to_string());
        }
        Ok(self.predict(window))
    }

    fn name(&self) -> &str {
        "GRU Regressor"
    }
}

fn sigmoid(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

fn tanh(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.tanh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_cell_step_shape() {
        let cell = GruCell::new(6, 10);
        let x = Array1::zeros(6);
        let h = cell.init_hidden();
        assert_eq!(cell.step(x.view(), &h).len(), 10);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = GruRegressor::new(6);
        let window = Array2::from_elem((30, 6), 0.4);
        let a = model.predict(window.view());
        let b = model.predict(window.view());
        assert_eq!(a, b);
    }

    #[test]
    fn test_predict_next_rejects_wrong_width() {
        let model = GruRegressor::new(6);
        let window = Array2::from_elem((30, 4), 0.4);
        assert!(model.predict_next(window.view()).is_err());
    }

    #[test]
    fn test_serde_round_trip_preserves_predictions() {
        let model = GruRegressor::new(6);
        let window = Array2::from_elem((30, 6), 0.25);
        let before = model.predict(window.view());

        let json = serde_json::to_string(&model).unwrap();
        let restored: GruRegressor = serde_json::from_str(&json).unwrap();
        let after = restored.predict(window.view());

        assert!((before - after).abs() < 1e-12);
    }

    #[test]
    fn test_dropout_mask_values() {
        let model = GruRegressor::new(6);
        let mask = model.dropout_mask();
        let keep = 1.0 - DROPOUT_RATE;
        for &v in mask.iter() {
            assert!(v == 0.0 || (v - 1.0 / keep).abs() < 1e-12);
        }
    }
}
