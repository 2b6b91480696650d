//! Stochastic gradient descent with optional momentum and L2 regularization.

use crate::autograd::{ScalarNode, Value};
use crate::optim::{regularized_grad, Optimizer};

/// Gradient descent. With `momentum > 0` the update is `v = momentum * v - lr * grad`,
/// `value += v`; otherwise `value -= lr * grad`.
#[derive(Clone, Debug)]
pub struct Sgd {
    lr: f64,
    momentum: f64,
    l2: f64,
    params: Vec<Value>,
    velocity: Vec<f64>,
}

impl Sgd {
    #[must_use]
    pub fn new(lr: f64) -> Self {
        Sgd {
            lr,
            momentum: 0.0,
            l2: 0.0,
            params: Vec::new(),
            velocity: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    #[must_use]
    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }
}

impl Optimizer for Sgd {
    fn add_param(&mut self, param: &Value) {
        self.params.push(param.clone());
        self.velocity.push(0.0);
    }

    fn params(&self) -> &[Value] {
        &self.params
    }

    fn step(&mut self) {
        for (param, v) in self.params.iter().zip(&mut self.velocity) {
            let value = param.value();
            let grad = regularized_grad(value, param.grad(), self.l2);
            if self.momentum > 0.0 {
                *v = self.momentum * *v - self.lr * grad;
                param.set_value(value + *v);
            } else {
                param.set_value(value - self.lr * grad);
            }
        }
    }
}
