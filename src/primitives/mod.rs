//! Core numeric primitives.

mod matrix;

pub(crate) use matrix::argmax;
pub use matrix::Matrix;
