//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rtorch_optim::nn::Layer;
use rtorch_optim::tensor::{Matrix, Vector};

/// Layer that keeps its parameters and remembers every delta it was given.
#[derive(Debug, Clone)]
pub struct RecordingLayer {
    pub weight: Matrix,
    pub bias: Vector,
    pub weight_deltas: Vec<Matrix>,
    pub bias_deltas: Vec<Vector>,
}

impl RecordingLayer {
    /// Zero parameters with weight shape `(rows, cols)` and bias length `rows`.
    pub fn new(rows: usize, cols: usize) -> Self {
        RecordingLayer {
            weight: Matrix::zeros((rows, cols)),
            bias: Vector::zeros(rows),
            weight_deltas: Vec::new(),
            bias_deltas: Vec::new(),
        }
    }

    pub fn updates(&self) -> usize {
        self.weight_deltas.len()
    }

    pub fn last_weight_delta(&self) -> &Matrix {
        self.weight_deltas.last().expect("layer was never updated")
    }

    pub fn last_bias_delta(&self) -> &Vector {
        self.bias_deltas.last().expect("layer was never updated")
    }
}

impl Layer for RecordingLayer {
    fn weight_dim(&self) -> (usize, usize) {
        self.weight.dim()
    }

    fn bias_dim(&self) -> usize {
        self.bias.len()
    }

    fn update(&mut self, weight_delta: &Matrix, bias_delta: &Vector) {
        self.weight += weight_delta;
        self.bias += bias_delta;
        self.weight_deltas.push(weight_delta.clone());
        self.bias_deltas.push(bias_delta.clone());
    }
}

/// Constant gradients shaped for `layers`.
pub fn filled_grads(layers: &[RecordingLayer], value: f32) -> (Vec<Matrix>, Vec<Vector>) {
    let w = layers.iter().map(|l| Matrix::from_elem(l.weight.dim(), value)).collect();
    let b = layers.iter().map(|l| Vector::from_elem(l.bias.len(), value)).collect();
    (w, b)
}
