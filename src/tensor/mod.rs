//! # Tensor Module
//!
//! Parameter-shaped containers used by layers and optimizers.
//! Weights live in a 2-D `Matrix`, biases in a 1-D `Vector`; both are plain
//! `ndarray` arrays so they can be handed around without extra wrapping.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Submodules ---
pub mod ops;

// --- Error Handling ---
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: ParamShape, got: ParamShape },
    #[error("Generic error: {0}")]
    Generic(String),
}

// Define a type alias for the underlying data type (e.g., f32)
pub type TensorData = f32;

/// Weight container: shape `(out_features, in_features)`.
pub type Matrix = Array2<TensorData>;

/// Bias container: shape `(out_features)`.
pub type Vector = Array1<TensorData>;

/// Shape of a single parameter tensor.
///
/// Vectors are reported as a single column so weight and bias shapes can be
/// compared and printed the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamShape {
    pub rows: usize,
    pub cols: usize,
}

impl ParamShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        ParamShape { rows, cols }
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Returns the shape of a weight matrix.
pub fn matrix_shape(m: &Matrix) -> ParamShape {
    let (rows, cols) = m.dim();
    ParamShape::new(rows, cols)
}

/// Returns the shape of a bias vector (as a single column).
pub fn vector_shape(v: &Vector) -> ParamShape {
    ParamShape::new(v.len(), 1)
}

/// Helper to create an all-zero matrix with the same shape as `m`.
pub fn zeros_like_matrix(m: &Matrix) -> Matrix {
    Matrix::zeros(m.raw_dim())
}

/// Helper to create an all-zero vector with the same length as `v`.
pub fn zeros_like_vector(v: &Vector) -> Vector {
    Vector::zeros(v.raw_dim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn shapes_report_rows_and_cols() {
        let m = Matrix::zeros((3, 4));
        let v = Vector::zeros(3);
        assert_eq!(matrix_shape(&m), ParamShape::new(3, 4));
        assert_eq!(vector_shape(&v), ParamShape::new(3, 1));
        assert_eq!(matrix_shape(&m).size(), 12);
        assert_eq!(matrix_shape(&m).to_string(), "3x4");
    }

    #[test]
    fn zeros_like_keeps_shape() {
        let m = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let z = zeros_like_matrix(&m);
        assert_eq!(z.dim(), (3, 2));
        assert!(z.iter().all(|&x| x == 0.0));

        let v = array![1.0, -1.0];
        let zv = zeros_like_vector(&v);
        assert_eq!(zv.len(), 2);
        assert!(zv.iter().all(|&x| x == 0.0));
    }
}
