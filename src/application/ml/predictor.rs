use ndarray::ArrayView2;

/// Interface for the regression model behind the forecaster.
///
/// Implemented by the GRU regressor in production and by fixed stubs in
/// tests, so the iterative forecast loop can be checked against
/// hand-computed values.
pub trait PricePredictor: Send + Sync {
    /// Predicts the scaled next price from a (window_size x features) slice.
    fn predict_next(&self, window: ArrayView2<'_, f64>) -> Result<f64, String>;

    /// Model name/type for logs.
    fn name(&self) -> &str;
}
