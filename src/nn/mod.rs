//! # Neural Network Module (`nn`)
//!
//! The layer side of the optimizer contract. Optimizers never read a layer's
//! weights; they only ask for parameter shapes and hand over deltas.

use crate::tensor::{Matrix, ParamShape, Vector};
use std::fmt::Debug;

// --- Submodules ---
pub mod modules;

// Re-export common items
pub use modules::*;

// --- Core Trait: Layer ---

/// A network layer owning one weight matrix and one bias vector.
pub trait Layer: Debug {
    /// Shape of the weight matrix, `(rows, cols)`.
    fn weight_dim(&self) -> (usize, usize);

    /// Length of the bias vector.
    fn bias_dim(&self) -> usize;

    /// Applies a step in place: `weight += weight_delta`, `bias += bias_delta`.
    ///
    /// The sign of the step is already folded into the deltas. Delta shapes
    /// match `weight_dim()` / `bias_dim()`; optimizers check this before calling.
    fn update(&mut self, weight_delta: &Matrix, bias_delta: &Vector);

    /// Weight shape as a `ParamShape`.
    fn weight_shape(&self) -> ParamShape {
        let (rows, cols) = self.weight_dim();
        ParamShape::new(rows, cols)
    }

    /// Bias shape as a single-column `ParamShape`.
    fn bias_shape(&self) -> ParamShape {
        ParamShape::new(self.bias_dim(), 1)
    }
}

impl<L: Layer + ?Sized> Layer for &mut L {
    fn weight_dim(&self) -> (usize, usize) {
        (**self).weight_dim()
    }

    fn bias_dim(&self) -> usize {
        (**self).bias_dim()
    }

    fn update(&mut self, weight_delta: &Matrix, bias_delta: &Vector) {
        (**self).update(weight_delta, bias_delta)
    }
}

impl<L: Layer + ?Sized> Layer for Box<L> {
    fn weight_dim(&self) -> (usize, usize) {
        (**self).weight_dim()
    }

    fn bias_dim(&self) -> usize {
        (**self).bias_dim()
    }

    fn update(&mut self, weight_delta: &Matrix, bias_delta: &Vector) {
        (**self).update(weight_delta, bias_delta)
    }
}
