//! Adam (Adaptive Moment Estimation) for the linear head.

use ndarray::Array1;

pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    t: i32,
    m_w: Array1<f64>,
    v_w: Array1<f64>,
    m_b: f64,
    v_b: f64,
}

impl Adam {
    pub fn new(learning_rate: f64, dim: usize) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            m_w: Array1::zeros(dim),
            v_w: Array1::zeros(dim),
            m_b: 0.0,
            v_b: 0.0,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Learning-rate schedule hook; used by the plateau policy.
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// One update of weights and bias from their gradients, with
    /// bias-corrected first and second moment estimates.
    pub fn step(
        &mut self,
        weights: &mut Array1<f64>,
        bias: &mut f64,
        grad_w: &Array1<f64>,
        grad_b: f64,
    ) {
        self.t += 1;
        let correction1 = 1.0 - self.beta1.powi(self.t);
        let correction2 = 1.0 - self.beta2.powi(self.t);

        self.m_w = &self.m_w * self.beta1 + grad_w * (1.0 - self.beta1);
        self.v_w = &self.v_w * self.beta2 + &(grad_w * grad_w) * (1.0 - self.beta2);
        let m_hat = &self.m_w / correction1;
        let v_hat = &self.v_w / correction2;
        *weights = &*weights - &(&m_hat * self.learning_rate / &(v_hat.mapv(f64::sqrt) + self.epsilon));

        self.m_b = self.m_b * self.beta1 + grad_b * (1.0 - self.beta1);
        self.v_b = self.v_b * self.beta2 + grad_b * grad_b * (1.0 - self.beta2);
        let m_hat_b = self.m_b / correction1;
        let v_hat_b = self.v_b / correction2;
        *bias -= self.learning_rate * m_hat_b / (v_hat_b.sqrt() + self.epsilon);
    }
}
