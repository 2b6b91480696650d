//! Adam: bias-corrected first and second gradient moments.

use crate::autograd::{ScalarNode, Value};
use crate::optim::{regularized_grad, Optimizer};

pub const DEFAULT_BETA1: f64 = 0.9;
pub const DEFAULT_BETA2: f64 = 0.999;
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Adam optimizer.
///
/// Per step `t` (shared by all parameters):
/// `m = b1 m + (1 - b1) g`, `v = b2 v + (1 - b2) g^2`,
/// `value -= lr * (m / (1 - b1^t)) / (sqrt(v / (1 - b2^t)) + eps)`.
#[derive(Clone, Debug)]
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    l2: f64,
    t: i32,
    params: Vec<Value>,
    m: Vec<f64>,
    v: Vec<f64>,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f64) -> Self {
        Adam {
            lr,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            l2: 0.0,
            t: 0,
            params: Vec::new(),
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn steps(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn add_param(&mut self, param: &Value) {
        self.params.push(param.clone());
        self.m.push(0.0);
        self.v.push(0.0);
    }

    fn params(&self) -> &[Value] {
        &self.params
    }

    fn step(&mut self) {
        self.t += 1;
        let m_correction = 1.0 - self.beta1.powi(self.t);
        let v_correction = 1.0 - self.beta2.powi(self.t);
        for ((param, m), v) in self.params.iter().zip(&mut self.m).zip(&mut self.v) {
            let value = param.value();
            let grad = regularized_grad(value, param.grad(), self.l2);
            *m = self.beta1 * *m + (1.0 - self.beta1) * grad;
            *v = self.beta2 * *v + (1.0 - self.beta2) * grad * grad;

            let m_hat = *m / m_correction;
            let v_hat = *v / v_correction;
            param.set_value(value - self.lr * m_hat / (v_hat.sqrt() + self.epsilon));
        }
    }
}
