pub mod gru;
pub mod optimizer;
pub mod predictor;
