//! Three-channel vector of scalar nodes: positions, directions and colours.

use super::scalar::Value;
use crate::autograd::{AutogradError, ScalarNode};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 3-vector of differentiable scalars with componentwise algebra.
///
/// Equality compares forward values only; it exists so delta BSDFs can test whether a
/// queried direction is exactly the one they would have sampled.
#[derive(Clone)]
pub struct Vec3 {
    pub x: Value,
    pub y: Value,
    pub z: Value,
}

impl Vec3 {
    #[must_use]
    pub fn new(x: Value, y: Value, z: Value) -> Self {
        Vec3 { x, y, z }
    }

    /// Untracked vector.
    #[must_use]
    pub fn constant(x: f64, y: f64, z: f64) -> Self {
        Vec3::new(Value::constant(x), Value::constant(y), Value::constant(z))
    }

    /// Vector of three gradient-tracking leaves.
    #[must_use]
    pub fn parameter(x: f64, y: f64, z: f64) -> Self {
        Vec3::new(Value::parameter(x), Value::parameter(y), Value::parameter(z))
    }

    #[must_use]
    pub fn from_values([x, y, z]: [f64; 3], requires_grad: bool) -> Self {
        Vec3::new(
            Value::new(x, requires_grad),
            Value::new(y, requires_grad),
            Value::new(z, requires_grad),
        )
    }

    #[must_use]
    pub fn zeros() -> Self {
        Vec3::constant(0.0, 0.0, 0.0)
    }

    /// The three channels in x, y, z order.
    #[must_use]
    pub fn channels(&self) -> [&Value; 3] {
        [&self.x, &self.y, &self.z]
    }

    #[must_use]
    pub fn values(&self) -> [f64; 3] {
        self.channels().map(ScalarNode::value)
    }

    #[must_use]
    pub fn grads(&self) -> [f64; 3] {
        self.channels().map(ScalarNode::grad)
    }

    /// Overwrites the three forward values in place.
    pub fn set_values(&self, values: [f64; 3]) {
        for (channel, value) in self.channels().into_iter().zip(values) {
            channel.set_value(value);
        }
    }

    /// Toggles gradient tracking on all three channels.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::NonLeaf`] if any channel is a derived value.
    pub fn requires_grad(&self, flag: bool) -> Result<(), AutogradError> {
        self.channels()
            .into_iter()
            .try_for_each(|channel| channel.requires_grad(flag))
    }

    pub fn zero_grad(&self) {
        for channel in self.channels() {
            channel.zero_grad();
        }
    }

    /// Returns `true` if any channel is tracked.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.channels().into_iter().any(Value::is_tracked)
    }

    #[must_use]
    pub fn detach(&self) -> Vec3 {
        Vec3::from_values(self.values(), false)
    }

    /// Smallest channel value (not differentiated).
    #[must_use]
    pub fn min(&self) -> f64 {
        let [x, y, z] = self.values();
        x.min(y).min(z)
    }

    /// Largest channel value (not differentiated).
    #[must_use]
    pub fn max(&self) -> f64 {
        let [x, y, z] = self.values();
        x.max(y).max(z)
    }

    #[must_use]
    pub fn dot(&self, other: &Vec3) -> Value {
        &(&(&self.x * &other.x) + &(&self.y * &other.y)) + &(&self.z * &other.z)
    }

    #[must_use]
    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            &(&self.y * &other.z) - &(&self.z * &other.y),
            &(&self.z * &other.x) - &(&self.x * &other.z),
            &(&self.x * &other.y) - &(&self.y * &other.x),
        )
    }

    #[must_use]
    pub fn norm_squared(&self) -> Value {
        self.dot(self)
    }

    #[must_use]
    pub fn norm(&self) -> Value {
        self.norm_squared().sqrt()
    }

    /// Divides each channel by the norm.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] for the zero vector.
    pub fn normalize(&self) -> Result<Vec3, AutogradError> {
        self / &self.norm()
    }

    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.channels().into_iter().any(Value::is_nan)
    }

    fn map(&self, f: impl Fn(&Value) -> Value) -> Vec3 {
        Vec3::new(f(&self.x), f(&self.y), f(&self.z))
    }

    fn zip(&self, other: &Vec3, f: impl Fn(&Value, &Value) -> Value) -> Vec3 {
        Vec3::new(f(&self.x, &other.x), f(&self.y, &other.y), f(&self.z, &other.z))
    }
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Self) -> bool {
        self.values() == other.values()
    }
}

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vec3").field(&self.values()).finish()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.values();
        write!(f, "[{x}, {y}, {z}]")
    }
}

// -----------------------------------------------------------------------------
// std::ops: componentwise +, -, *, scaling by a scalar node or f64, negation
// -----------------------------------------------------------------------------

impl Add for &Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Self) -> Vec3 {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for &Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Self) -> Vec3 {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for &Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Self) -> Vec3 {
        self.zip(rhs, |a, b| a * b)
    }
}

impl Mul<&Value> for &Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: &Value) -> Vec3 {
        self.map(|a| a * rhs)
    }
}

impl Mul<f64> for &Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        self * &Value::constant(rhs)
    }
}

impl Div<&Value> for &Vec3 {
    type Output = Result<Vec3, AutogradError>;

    fn div(self, rhs: &Value) -> Self::Output {
        Ok(Vec3::new(
            (&self.x / rhs)?,
            (&self.y / rhs)?,
            (&self.z / rhs)?,
        ))
    }
}

impl Div<f64> for &Vec3 {
    type Output = Result<Vec3, AutogradError>;

    fn div(self, rhs: f64) -> Self::Output {
        self / &Value::constant(rhs)
    }
}

impl Neg for &Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        self.map(|a| -a)
    }
}
