//! Autograd: scalar and 3-vector computation graphs with reverse-mode differentiation.
//!
//! Every arithmetic operation on a [`Value`] creates a fresh graph node that remembers
//! how to push an upstream gradient into its operands. [`ScalarNode::backward`] walks
//! from a result node back to every tracked leaf, accumulating into each leaf's
//! gradient cell. Values built only from untracked leaves never grow a graph.

mod error;
pub mod impls;

pub use error::AutogradError;
pub use impls::scalar::Value;
pub use impls::vector::Vec3;

/// Trait for raising a node to a constant power (e.g. `(&a).pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Implementations hold a single float value and a gradient accumulator, and
/// participate in backward propagation. Use [`ScalarNode::value`] for the
/// forward value and [`ScalarNode::grad`] after [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Returns the forward pass value.
    fn value(&self) -> f64;

    /// Returns the accumulated gradient (only leaves that require gradients accumulate).
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node with a seed gradient of 1.
    fn backward(&self);

    /// Zeros the gradient accumulator of a gradient-tracking leaf.
    fn zero_grad(&self);
}
