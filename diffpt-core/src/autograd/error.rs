//! Autograd errors.
//!
//! The engine has no recoverable numeric state: a failed operation means the value being
//! built is meaningless, so callers propagate [`AutogradError`] up to whoever started the
//! computation (usually a render call).

/// Errors produced while building or mutating a computation graph.
///
/// # Variants
///
/// - **DivisionByZero**: A scalar or vector was divided by an exact zero.
///   *When*: `&a / &b` with `b == 0`, [`Vec3::normalize`](super::Vec3::normalize) on a zero vector,
///   or dividing a vector by a zero scalar.
///   *Recovery*: None for the current computation; fix the degenerate input (e.g. a zero-length
///   direction or a light placed exactly on a surface).
///
/// - **NonLeaf**: Gradient tracking was toggled on a derived value.
///   *When*: [`Value::requires_grad`](super::Value::requires_grad) on a node produced by an operation.
///   *Recovery*: Toggle the flag on the leaf the value was derived from, before building the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AutogradError {
    /// Division by an exact zero.
    #[error("autograd: division by zero")]
    DivisionByZero,

    /// `requires_grad` called on a value that is not a leaf.
    #[error("autograd: cannot change gradient-tracking on a derived value")]
    NonLeaf,
}
