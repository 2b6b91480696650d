pub mod sphere;
pub mod triangle;
