//! Graph node implementations: [`scalar::Value`] and the three-channel [`vector::Vec3`].

pub mod scalar;
pub mod vector;
