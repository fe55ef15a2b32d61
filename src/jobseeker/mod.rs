pub mod lenient;
pub mod model;
pub mod scalar;

pub use model::*;
pub use scalar::{Flag, Scalar};
