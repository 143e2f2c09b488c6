pub mod matrix;
pub mod binary;

pub use matrix::Matrix;
