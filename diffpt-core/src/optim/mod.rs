//! Gradient-based optimizers over shared parameter handles.
//!
//! An optimizer holds clones of the leaves it updates, so the values it writes in
//! [`Optimizer::step`] are the ones the next render reads. Per-parameter state is kept in
//! buffers aligned with the registration order.

pub mod impls;

pub use impls::adam::Adam;
pub use impls::sgd::Sgd;

use crate::autograd::{Value, Vec3};

/// Registration, gradient reset and update step shared by all optimizers.
pub trait Optimizer {
    /// Registers a scalar parameter and appends its zeroed auxiliary state.
    fn add_param(&mut self, param: &Value);

    /// Registers the three channels of a vector parameter in x, y, z order.
    fn add_vec3(&mut self, param: &Vec3) {
        for channel in param.channels() {
            self.add_param(channel);
        }
    }

    /// Registered parameters in registration order.
    fn params(&self) -> &[Value];

    /// Resets every registered gradient accumulator.
    ///
    /// Call once per `render -> backward -> step` cycle, before rendering; gradients
    /// otherwise keep accumulating across steps.
    fn zero_grad(&self) {
        for param in self.params() {
            param.reset_grad();
        }
    }

    /// Applies one update from the accumulated gradients.
    fn step(&mut self);
}

/// Raw gradient plus the optional L2 term `l2 * value`.
fn regularized_grad(value: f64, grad: f64, l2: f64) -> f64 {
    if l2 > 0.0 {
        grad + l2 * value
    } else {
        grad
    }
}
