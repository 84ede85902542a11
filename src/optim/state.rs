//! # Optimizer State
//!
//! Per-layer accumulator storage shared by all optimizers.

use crate::tensor::{matrix_shape, vector_shape, zeros_like_matrix, zeros_like_vector, Matrix, ParamShape, Vector};
use serde::{Deserialize, Serialize};

/// One accumulator pair, shaped like a layer's weight and bias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSlot {
    pub weight: Matrix,
    pub bias: Vector,
}

impl ParamSlot {
    pub fn weight_shape(&self) -> ParamShape {
        matrix_shape(&self.weight)
    }

    pub fn bias_shape(&self) -> ParamShape {
        vector_shape(&self.bias)
    }
}

/// Ordered accumulator pairs, indexed by layer position.
///
/// Starts empty and is seeded exactly once from the first batch of gradients.
/// After that the number of slots and their shapes never change; updates
/// happen in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerState {
    slots: Vec<ParamSlot>,
    initialized: bool,
}

impl OptimizerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Allocates one all-zero slot per layer, shaped like the given gradients.
    ///
    /// Callers validate the gradients first (equal lengths, consistent shapes).
    pub(crate) fn init_zeros(&mut self, weight_grads: &[Matrix], bias_grads: &[Vector]) {
        debug_assert!(!self.initialized, "optimizer state initialized twice");
        debug_assert_eq!(weight_grads.len(), bias_grads.len());

        let mut slots = Vec::with_capacity(weight_grads.len());
        for (w, b) in weight_grads.iter().zip(bias_grads) {
            slots.push(ParamSlot {
                weight: zeros_like_matrix(w),
                bias: zeros_like_vector(b),
            });
        }
        self.slots = slots;
        self.initialized = true;
    }

    /// Number of layers tracked (0 before initialization).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, layer: usize) -> Option<&ParamSlot> {
        self.slots.get(layer)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParamSlot> {
        self.slots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, ParamSlot> {
        self.slots.iter_mut()
    }
}

impl<'a> IntoIterator for &'a OptimizerState {
    type Item = &'a ParamSlot;
    type IntoIter = std::slice::Iter<'a, ParamSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
