//! Scalar autograd: a dynamic DAG of single float values with backpropagation.

use crate::autograd::{AutogradError, Pow, ScalarNode};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
enum UnaryOp {
    Neg,
    Pow(f64),
    Sin,
    Cos,
}

#[derive(Clone, Copy, Debug)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// How a node pushes an upstream gradient into the graph.
///
/// Fixed at construction; only leaves switch between `Detached` and `Accumulate`.
enum Rule {
    /// Untracked value: backward is a no-op and no operand is retained.
    Detached,
    /// Tracked leaf: backward adds the upstream gradient into `grad`.
    Accumulate,
    Unary(UnaryOp, Value),
    Binary(BinaryOp, Value, Value),
}

/// Internal scalar node: forward value, gradient accumulator and backward rule.
struct Node {
    value: Cell<f64>,
    grad: Cell<f64>,
    rule: RefCell<Rule>,
}

impl Drop for Node {
    /// Frees the operands this node uniquely owns with an explicit stack, so dropping a
    /// long chain does not recurse once per node.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_operands(self.rule.get_mut(), &mut pending);
        while let Some(Value(rc)) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(rc) {
                take_operands(node.rule.get_mut(), &mut pending);
            }
        }
    }
}

fn take_operands(rule: &mut Rule, pending: &mut Vec<Value>) {
    match std::mem::replace(rule, Rule::Detached) {
        Rule::Unary(_, operand) => pending.push(operand),
        Rule::Binary(_, left, right) => {
            pending.push(left);
            pending.push(right);
        }
        Rule::Detached | Rule::Accumulate => {}
    }
}

/// Handle to a scalar node in the autograd computation graph.
///
/// Cloning a `Value` shares the node: a leaf parameter cloned into a material and into an
/// optimizer is one cell, so the optimizer sees gradients accumulated during rendering and
/// the next render sees the optimizer's update.
///
/// # Example
///
/// ```
/// use diffpt_core::autograd::{ScalarNode, Value};
///
/// let a = Value::parameter(2.0);
/// let b = Value::constant(3.0);
/// let c = &a * &b;
/// c.backward();
/// assert_eq!(a.grad(), 3.0);
/// assert_eq!(b.grad(), 0.0);
/// ```
#[derive(Clone)]
pub struct Value(Rc<Node>);

impl Value {
    /// Creates a leaf. With `requires_grad` the leaf accumulates gradients during backward.
    #[must_use]
    pub fn new(value: f64, requires_grad: bool) -> Self {
        let rule = if requires_grad {
            Rule::Accumulate
        } else {
            Rule::Detached
        };
        Value::with_rule(value, rule)
    }

    /// Creates an untracked leaf.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Value::new(value, false)
    }

    /// Creates a gradient-tracking leaf.
    #[must_use]
    pub fn parameter(value: f64) -> Self {
        Value::new(value, true)
    }

    fn with_rule(value: f64, rule: Rule) -> Self {
        Value(Rc::new(Node {
            value: Cell::new(value),
            grad: Cell::new(0.0),
            rule: RefCell::new(rule),
        }))
    }

    fn unary(op: UnaryOp, operand: &Value, value: f64) -> Value {
        if operand.is_tracked() {
            Value::with_rule(value, Rule::Unary(op, operand.clone()))
        } else {
            Value::constant(value)
        }
    }

    fn binary(op: BinaryOp, left: &Value, right: &Value, value: f64) -> Value {
        if left.is_tracked() || right.is_tracked() {
            Value::with_rule(value, Rule::Binary(op, left.clone(), right.clone()))
        } else {
            Value::constant(value)
        }
    }

    /// Overwrites the forward value in place (optimizer updates, scene edits).
    ///
    /// Graphs built earlier keep referencing this cell and read the new value if they are
    /// differentiated afterwards.
    pub fn set_value(&self, value: f64) {
        self.0.value.set(value);
    }

    /// Returns `true` for nodes not produced by an operation.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(*self.0.rule.borrow(), Rule::Detached | Rule::Accumulate)
    }

    /// Returns `true` if a backward pass through this node can reach a tracked leaf.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        !matches!(*self.0.rule.borrow(), Rule::Detached)
    }

    /// Toggles gradient tracking on a leaf.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::NonLeaf`] when called on a value produced by an operation.
    pub fn requires_grad(&self, flag: bool) -> Result<(), AutogradError> {
        let mut rule = self.0.rule.borrow_mut();
        match *rule {
            Rule::Detached | Rule::Accumulate => {
                *rule = if flag {
                    Rule::Accumulate
                } else {
                    Rule::Detached
                };
                Ok(())
            }
            Rule::Unary(..) | Rule::Binary(..) => Err(AutogradError::NonLeaf),
        }
    }

    /// Returns an untracked leaf holding the current value.
    #[must_use]
    pub fn detach(&self) -> Value {
        Value::constant(self.value())
    }

    /// Resets the accumulator regardless of the node's rule.
    pub(crate) fn reset_grad(&self) {
        self.0.grad.set(0.0);
    }

    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.value().is_nan()
    }

    #[must_use]
    pub fn is_grad_nan(&self) -> bool {
        self.grad().is_nan()
    }

    /// Square root, as `self^0.5`.
    #[must_use]
    pub fn sqrt(&self) -> Value {
        self.pow(0.5)
    }

    #[must_use]
    pub fn sin(&self) -> Value {
        Value::unary(UnaryOp::Sin, self, self.value().sin())
    }

    #[must_use]
    pub fn cos(&self) -> Value {
        Value::unary(UnaryOp::Cos, self, self.value().cos())
    }

    /// Runs backpropagation from this node with the given upstream gradient.
    ///
    /// Each edge is walked once per consuming node, so a value with fan-out N is visited
    /// N times. Untracked operands are never pushed.
    pub fn backward_with(&self, seed: f64) {
        let mut pending = vec![(self.clone(), seed)];
        while let Some((node, upstream)) = pending.pop() {
            let rule = node.0.rule.borrow();
            match &*rule {
                Rule::Detached => {}
                Rule::Accumulate => node.0.grad.set(node.0.grad.get() + upstream),
                Rule::Unary(op, operand) => {
                    let x = operand.value();
                    let local = match *op {
                        UnaryOp::Neg => -1.0,
                        UnaryOp::Pow(exp) => exp * x.powf(exp - 1.0),
                        UnaryOp::Sin => x.cos(),
                        UnaryOp::Cos => -x.sin(),
                    };
                    push_tracked(&mut pending, operand, upstream * local);
                }
                Rule::Binary(op, left, right) => {
                    let (l, r) = (left.value(), right.value());
                    let (dl, dr) = match op {
                        BinaryOp::Add => (upstream, upstream),
                        BinaryOp::Sub => (upstream, -upstream),
                        BinaryOp::Mul => (upstream * r, upstream * l),
                        // r was non-zero when the node was built; a leaf reset to 0 since
                        // then yields non-finite gradients here.
                        BinaryOp::Div => (upstream / r, -upstream * l / (r * r)),
                    };
                    push_tracked(&mut pending, left, dl);
                    push_tracked(&mut pending, right, dr);
                }
            }
        }
    }
}

fn push_tracked(pending: &mut Vec<(Value, f64)>, operand: &Value, grad: f64) {
    if operand.is_tracked() {
        pending.push((operand.clone(), grad));
    }
}

impl ScalarNode for Value {
    fn value(&self) -> f64 {
        self.0.value.get()
    }

    fn grad(&self) -> f64 {
        self.0.grad.get()
    }

    fn backward(&self) {
        self.backward_with(1.0);
    }

    fn zero_grad(&self) {
        if matches!(*self.0.rule.borrow(), Rule::Accumulate) {
            self.reset_grad();
        } else {
            log::warn!("zero_grad called on a value that does not accumulate gradients");
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("value", &self.value())
            .field("grad", &self.grad())
            .field("tracked", &self.is_tracked())
            .finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// std::ops algebra: x + y, x - y, x * y, x / y, -x (and f64 on either side)
// -----------------------------------------------------------------------------

impl Add for &Value {
    type Output = Value;

    fn add(self, rhs: Self) -> Value {
        Value::binary(BinaryOp::Add, self, rhs, self.value() + rhs.value())
    }
}

impl Sub for &Value {
    type Output = Value;

    fn sub(self, rhs: Self) -> Value {
        Value::binary(BinaryOp::Sub, self, rhs, self.value() - rhs.value())
    }
}

impl Mul for &Value {
    type Output = Value;

    fn mul(self, rhs: Self) -> Value {
        Value::binary(BinaryOp::Mul, self, rhs, self.value() * rhs.value())
    }
}

impl Div for &Value {
    type Output = Result<Value, AutogradError>;

    fn div(self, rhs: Self) -> Self::Output {
        let denominator = rhs.value();
        if denominator == 0.0 {
            return Err(AutogradError::DivisionByZero);
        }
        Ok(Value::binary(
            BinaryOp::Div,
            self,
            rhs,
            self.value() / denominator,
        ))
    }
}

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        Value::unary(UnaryOp::Neg, self, -self.value())
    }
}

impl Add<f64> for &Value {
    type Output = Value;

    fn add(self, rhs: f64) -> Value {
        self + &Value::constant(rhs)
    }
}

impl Sub<f64> for &Value {
    type Output = Value;

    fn sub(self, rhs: f64) -> Value {
        self - &Value::constant(rhs)
    }
}

impl Mul<f64> for &Value {
    type Output = Value;

    fn mul(self, rhs: f64) -> Value {
        self * &Value::constant(rhs)
    }
}

impl Div<f64> for &Value {
    type Output = Result<Value, AutogradError>;

    fn div(self, rhs: f64) -> Self::Output {
        self / &Value::constant(rhs)
    }
}

impl Add<&Value> for f64 {
    type Output = Value;

    fn add(self, rhs: &Value) -> Value {
        &Value::constant(self) + rhs
    }
}

impl Sub<&Value> for f64 {
    type Output = Value;

    fn sub(self, rhs: &Value) -> Value {
        &Value::constant(self) - rhs
    }
}

impl Mul<&Value> for f64 {
    type Output = Value;

    fn mul(self, rhs: &Value) -> Value {
        &Value::constant(self) * rhs
    }
}

impl Div<&Value> for f64 {
    type Output = Result<Value, AutogradError>;

    fn div(self, rhs: &Value) -> Self::Output {
        &Value::constant(self) / rhs
    }
}

impl Pow<f64> for &Value {
    type Output = Value;

    fn pow(self, exp: f64) -> Value {
        Value::unary(UnaryOp::Pow(exp), self, self.value().powf(exp))
    }
}
