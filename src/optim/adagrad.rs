//! # Adagrad Optimizer

use super::{check_epsilon, check_learning_rate, validate_step, Optimizer, OptimizerState, Result};
use crate::nn::Layer;
use crate::tensor::{ops, Matrix, TensorData, Vector};
use serde::{Deserialize, Serialize};

/// Default term added to the denominator.
pub const DEFAULT_EPSILON: TensorData = 1e-8;

/// Implements the Adagrad algorithm.
/// Reference: Adaptive Subgradient Methods for Online Learning and Stochastic Optimization - http://jmlr.org/papers/v12/duchi11a.html
///
/// For every layer, on every step:
///
/// ```text
/// G_w += grad_w^2
/// G_b += grad_b^2
/// delta_w = -lr * grad_w / sqrt(G_w + eps)
/// delta_b = -lr * grad_b / sqrt(G_b + eps)
/// layer.update(delta_w, delta_b)
/// ```
///
/// Each parameter's accumulator only ever grows, so its effective step size
/// shrinks with the amount of gradient it has seen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Adagrad {
    lr: TensorData,
    eps: TensorData,

    // Sum of squared gradients, one pair per layer
    sums: OptimizerState,
    // Scratch space for the deltas handed to the layers; rebuilt after loading
    #[serde(skip)]
    deltas: OptimizerState,
    t: u64,
}

impl Adagrad {
    /// Creates a new Adagrad optimizer instance.
    ///
    /// # Arguments
    /// * `lr`: Learning rate, finite and > 0.
    /// * `eps`: Term added inside the square root, finite and > 0.
    pub fn new(lr: TensorData, eps: TensorData) -> Result<Self> {
        check_learning_rate(lr)?;
        check_epsilon(eps)?;
        Ok(Adagrad {
            lr,
            eps,
            sums: OptimizerState::new(),
            deltas: OptimizerState::new(),
            t: 0,
        })
    }

    /// Constructor using [`DEFAULT_EPSILON`].
    pub fn with_lr(lr: TensorData) -> Result<Self> {
        Self::new(lr, DEFAULT_EPSILON)
    }

    pub fn epsilon(&self) -> TensorData {
        self.eps
    }

    /// Accumulated squared gradients, one pair per layer.
    pub fn sums(&self) -> &OptimizerState {
        &self.sums
    }
}

impl Optimizer for Adagrad {
    fn step<L: Layer>(
        &mut self,
        weight_grads: &[Matrix],
        bias_grads: &[Vector],
        layers: &mut [L],
    ) -> Result<()> {
        if let Err(e) = validate_step(weight_grads, bias_grads, layers, &self.sums) {
            log::warn!("adagrad: rejected step {}: {}", self.t + 1, e);
            return Err(e);
        }
        if !self.sums.is_initialized() {
            log::debug!("adagrad: allocating accumulators for {} layers", layers.len());
            self.sums.init_zeros(weight_grads, bias_grads);
        }
        if !self.deltas.is_initialized() {
            self.deltas.init_zeros(weight_grads, bias_grads);
        }

        self.t += 1;
        log::trace!("adagrad: step {}", self.t);

        let (lr, eps) = (self.lr, self.eps);
        let grads = weight_grads.iter().zip(bias_grads);
        let buffers = self.sums.iter_mut().zip(self.deltas.iter_mut());
        for (((g, delta), layer), (w_grad, b_grad)) in buffers.zip(layers.iter_mut()).zip(grads) {
            ops::accumulate_square(&mut g.weight, w_grad);
            ops::accumulate_square(&mut g.bias, b_grad);

            ops::adaptive_delta(&mut delta.weight, w_grad, &g.weight, lr, eps);
            ops::adaptive_delta(&mut delta.bias, b_grad, &g.bias, lr, eps);

            layer.update(&delta.weight, &delta.bias);
        }
        Ok(())
    }

    fn learning_rate(&self) -> TensorData {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: TensorData) -> Result<()> {
        check_learning_rate(lr)?;
        self.lr = lr;
        Ok(())
    }

    fn steps(&self) -> u64 {
        self.t
    }

    fn state(&self) -> &OptimizerState {
        &self.sums
    }

    fn check_config(&self) -> Result<()> {
        check_learning_rate(self.lr)?;
        check_epsilon(self.eps)
    }
}
