//! # Linear Layer Module

use crate::nn::Layer;
use crate::tensor::{matrix_shape, vector_shape, Matrix, ParamShape, TensorData, TensorError, Vector};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Applies a linear transformation to the incoming data: `y = Wx + b`.
///
/// Weight shape: `(out_features, in_features)`, bias shape: `(out_features)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Linear {
    weight: Matrix,
    bias: Vector,
}

impl Linear {
    /// Creates a new Linear layer with Kaiming uniform initialization,
    /// drawing from the thread-local RNG.
    ///
    /// # Arguments
    /// * `in_features`: Size of each input sample.
    /// * `out_features`: Size of each output sample.
    pub fn new(in_features: usize, out_features: usize) -> Self {
        Self::with_rng(in_features, out_features, &mut rand::thread_rng())
    }

    /// Same as [`Linear::new`] but with a caller-supplied RNG (useful for reproducible runs).
    ///
    /// Weights and bias are drawn from `uniform(-k, k)` with `k = 1/sqrt(in_features)`,
    /// similar to PyTorch defaults.
    pub fn with_rng<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let weight = kaiming_uniform(rng, (out_features, in_features), in_features);
        let bias = match kaiming_range(in_features) {
            Some(range) => Vector::from_shape_simple_fn(out_features, || range.sample(rng)),
            None => Vector::zeros(out_features),
        };
        Linear { weight, bias }
    }

    /// All-zero parameters.
    pub fn zeros(in_features: usize, out_features: usize) -> Self {
        Linear {
            weight: Matrix::zeros((out_features, in_features)),
            bias: Vector::zeros(out_features),
        }
    }

    /// Builds a layer from existing parameters.
    ///
    /// Fails when the bias length differs from the number of weight rows.
    pub fn from_parts(weight: Matrix, bias: Vector) -> Result<Self, TensorError> {
        if bias.len() != weight.nrows() {
            return Err(TensorError::ShapeMismatch {
                expected: ParamShape::new(weight.nrows(), 1),
                got: vector_shape(&bias),
            });
        }
        Ok(Linear { weight, bias })
    }

    pub fn weight(&self) -> &Matrix {
        &self.weight
    }

    pub fn bias(&self) -> &Vector {
        &self.bias
    }

    pub fn in_features(&self) -> usize {
        self.weight.ncols()
    }

    pub fn out_features(&self) -> usize {
        self.weight.nrows()
    }

    /// Computes `W·x + b` for a single input sample.
    pub fn forward(&self, input: &Vector) -> Result<Vector, TensorError> {
        if input.len() != self.in_features() {
            return Err(TensorError::ShapeMismatch {
                expected: ParamShape::new(self.in_features(), 1),
                got: vector_shape(input),
            });
        }
        Ok(self.weight.dot(input) + &self.bias)
    }
}

impl Layer for Linear {
    fn weight_dim(&self) -> (usize, usize) {
        self.weight.dim()
    }

    fn bias_dim(&self) -> usize {
        self.bias.len()
    }

    fn update(&mut self, weight_delta: &Matrix, bias_delta: &Vector) {
        debug_assert_eq!(matrix_shape(&self.weight), matrix_shape(weight_delta));
        debug_assert_eq!(self.bias.len(), bias_delta.len());
        self.weight += weight_delta;
        self.bias += bias_delta;
    }
}

// Empty range when fan_in is zero (Uniform::new panics on an empty interval).
fn kaiming_range(fan_in: usize) -> Option<Uniform<TensorData>> {
    if fan_in == 0 {
        return None;
    }
    let k = (1.0 / fan_in as TensorData).sqrt();
    Some(Uniform::new(-k, k))
}

fn kaiming_uniform<R: Rng + ?Sized>(rng: &mut R, shape: (usize, usize), fan_in: usize) -> Matrix {
    match kaiming_range(fan_in) {
        Some(range) => Matrix::from_shape_simple_fn(shape, || range.sample(rng)),
        None => Matrix::zeros(shape),
    }
}
