//! # Optimization Algorithms (`optim`)
//!
//! Turns per-layer gradients into update deltas and applies them to a
//! sequence of layers. Each optimizer owns one accumulator pair per layer,
//! allocated lazily on the first `step` from the shapes of the gradients.

use crate::nn::Layer;
use crate::tensor::{matrix_shape, vector_shape, Matrix, ParamShape, TensorData, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Submodules ---
pub mod adagrad;
pub mod config;
pub mod sgd;
pub mod state;

// Re-export optimizers
pub use adagrad::Adagrad;
pub use config::{AdagradConfig, OptimizerConfig, SgdConfig};
pub use sgd::SGD;
pub use state::{OptimizerState, ParamSlot};

// --- Error Handling ---

/// Which parameter of a layer a shape error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Weight,
    Bias,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Weight => write!(f, "weight"),
            ParamKind::Bias => write!(f, "bias"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OptimError {
    #[error("Invalid learning rate {0}: must be finite and > 0")]
    InvalidLearningRate(TensorData),
    #[error("Invalid momentum {0}: must be finite and >= 0")]
    InvalidMomentum(TensorData),
    #[error("Invalid epsilon {0}: must be finite and > 0")]
    InvalidEpsilon(TensorData),
    #[error("Length mismatch: {weight_grads} weight gradients, {bias_grads} bias gradients, {layers} layers")]
    LengthMismatch {
        weight_grads: usize,
        bias_grads: usize,
        layers: usize,
    },
    #[error("Layer count changed: optimizer state holds {expected} layers, got {got}")]
    LayerCountChanged { expected: usize, got: usize },
    #[error("Shape mismatch for layer {layer} {param}: expected {expected}, got {got}")]
    ShapeMismatch {
        layer: usize,
        param: ParamKind,
        expected: ParamShape,
        got: ParamShape,
    },
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, OptimError>;

// --- Optimizer Trait ---

/// Base trait for all optimizers.
pub trait Optimizer {
    /// Performs a single optimization step over all layers.
    ///
    /// `weight_grads[i]` and `bias_grads[i]` are the gradients of `layers[i]`.
    /// The first call fixes the number of layers and the parameter shapes for
    /// the lifetime of the optimizer. Inputs are validated before anything is
    /// mutated: on error neither the optimizer state nor any layer changes.
    fn step<L: Layer>(
        &mut self,
        weight_grads: &[Matrix],
        bias_grads: &[Vector],
        layers: &mut [L],
    ) -> Result<()>;

    fn learning_rate(&self) -> TensorData;

    /// Replaces the learning rate, e.g. from an external schedule.
    fn set_learning_rate(&mut self, lr: TensorData) -> Result<()>;

    /// Number of successful steps so far.
    fn steps(&self) -> u64;

    /// The per-layer accumulators (velocities for SGD, squared-gradient sums for Adagrad).
    fn state(&self) -> &OptimizerState;

    /// Re-checks the hyper-parameters. Used after loading a checkpoint.
    fn check_config(&self) -> Result<()>;

    fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    /// Layer count fixed by the first step, if it happened.
    fn num_layers(&self) -> Option<usize> {
        self.is_initialized().then(|| self.state().len())
    }
}

// --- Hyper-parameter checks ---

pub(crate) fn check_learning_rate(lr: TensorData) -> Result<()> {
    if lr.is_finite() && lr > 0.0 {
        Ok(())
    } else {
        Err(OptimError::InvalidLearningRate(lr))
    }
}

pub(crate) fn check_momentum(momentum: TensorData) -> Result<()> {
    if !(momentum.is_finite() && momentum >= 0.0) {
        return Err(OptimError::InvalidMomentum(momentum));
    }
    if momentum >= 1.0 {
        log::warn!("momentum {} >= 1: velocities will not decay", momentum);
    }
    Ok(())
}

pub(crate) fn check_epsilon(eps: TensorData) -> Result<()> {
    if eps.is_finite() && eps > 0.0 {
        Ok(())
    } else {
        Err(OptimError::InvalidEpsilon(eps))
    }
}

// --- Step validation ---

fn check_shape(layer: usize, param: ParamKind, expected: ParamShape, got: ParamShape) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(OptimError::ShapeMismatch { layer, param, expected, got })
    }
}

/// Validates one `step` call against the layers and the established state.
///
/// Runs before any mutation so a bad call never leaves layers half updated.
pub(crate) fn validate_step<L: Layer>(
    weight_grads: &[Matrix],
    bias_grads: &[Vector],
    layers: &[L],
    state: &OptimizerState,
) -> Result<()> {
    if weight_grads.len() != layers.len() || bias_grads.len() != layers.len() {
        return Err(OptimError::LengthMismatch {
            weight_grads: weight_grads.len(),
            bias_grads: bias_grads.len(),
            layers: layers.len(),
        });
    }
    if state.is_initialized() && state.len() != layers.len() {
        return Err(OptimError::LayerCountChanged {
            expected: state.len(),
            got: layers.len(),
        });
    }

    for (i, ((w, b), layer)) in weight_grads.iter().zip(bias_grads).zip(layers).enumerate() {
        let w_shape = matrix_shape(w);
        let b_shape = vector_shape(b);
        check_shape(i, ParamKind::Weight, layer.weight_shape(), w_shape)?;
        check_shape(i, ParamKind::Bias, layer.bias_shape(), b_shape)?;
        if let Some(slot) = state.slot(i) {
            check_shape(i, ParamKind::Weight, slot.weight_shape(), w_shape)?;
            check_shape(i, ParamKind::Bias, slot.bias_shape(), b_shape)?;
        }
    }
    Ok(())
}

// --- Closed set of optimizers ---

/// Any optimizer this crate provides, selected at construction time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Optim {
    Sgd(SGD),
    Adagrad(Adagrad),
}

impl Optim {
    pub fn name(&self) -> &'static str {
        match self {
            Optim::Sgd(_) => "sgd",
            Optim::Adagrad(_) => "adagrad",
        }
    }
}

impl From<SGD> for Optim {
    fn from(opt: SGD) -> Self {
        Optim::Sgd(opt)
    }
}

impl From<Adagrad> for Optim {
    fn from(opt: Adagrad) -> Self {
        Optim::Adagrad(opt)
    }
}

impl Optimizer for Optim {
    fn step<L: Layer>(
        &mut self,
        weight_grads: &[Matrix],
        bias_grads: &[Vector],
        layers: &mut [L],
    ) -> Result<()> {
        match self {
            Optim::Sgd(opt) => opt.step(weight_grads, bias_grads, layers),
            Optim::Adagrad(opt) => opt.step(weight_grads, bias_grads, layers),
        }
    }

    fn learning_rate(&self) -> TensorData {
        match self {
            Optim::Sgd(opt) => opt.learning_rate(),
            Optim::Adagrad(opt) => opt.learning_rate(),
        }
    }

    fn set_learning_rate(&mut self, lr: TensorData) -> Result<()> {
        match self {
            Optim::Sgd(opt) => opt.set_learning_rate(lr),
            Optim::Adagrad(opt) => opt.set_learning_rate(lr),
        }
    }

    fn steps(&self) -> u64 {
        match self {
            Optim::Sgd(opt) => opt.steps(),
            Optim::Adagrad(opt) => opt.steps(),
        }
    }

    fn state(&self) -> &OptimizerState {
        match self {
            Optim::Sgd(opt) => opt.state(),
            Optim::Adagrad(opt) => opt.state(),
        }
    }

    fn check_config(&self) -> Result<()> {
        match self {
            Optim::Sgd(opt) => opt.check_config(),
            Optim::Adagrad(opt) => opt.check_config(),
        }
    }
}
