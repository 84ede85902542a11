//! # Stochastic Gradient Descent (SGD) Optimizer

use super::{check_learning_rate, check_momentum, validate_step, Optimizer, OptimizerState, Result};
use crate::nn::Layer;
use crate::tensor::{ops, Matrix, TensorData, Vector};
use serde::{Deserialize, Serialize};

/// Implements Stochastic Gradient Descent with heavy-ball momentum.
///
/// For every layer, on every step:
///
/// ```text
/// v_w = momentum * v_w - lr * grad_w
/// v_b = momentum * v_b - lr * grad_b
/// layer.update(v_w, v_b)
/// ```
///
/// With `momentum = 0` this is plain gradient descent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SGD {
    lr: TensorData,
    momentum: TensorData,
    // One velocity pair per layer
    velocities: OptimizerState,
    t: u64,
}

impl SGD {
    /// Creates a new SGD optimizer instance.
    ///
    /// # Arguments
    /// * `lr`: Learning rate, finite and > 0.
    /// * `momentum`: Momentum factor, finite and >= 0 (conventionally < 1).
    pub fn new(lr: TensorData, momentum: TensorData) -> Result<Self> {
        check_learning_rate(lr)?;
        check_momentum(momentum)?;
        Ok(SGD {
            lr,
            momentum,
            velocities: OptimizerState::new(),
            t: 0,
        })
    }

    /// Simplified constructor with only lr (no momentum).
    pub fn simple(lr: TensorData) -> Result<Self> {
        Self::new(lr, 0.0)
    }

    pub fn momentum(&self) -> TensorData {
        self.momentum
    }

    /// Current velocities, one pair per layer.
    pub fn velocities(&self) -> &OptimizerState {
        &self.velocities
    }
}

impl Optimizer for SGD {
    fn step<L: Layer>(
        &mut self,
        weight_grads: &[Matrix],
        bias_grads: &[Vector],
        layers: &mut [L],
    ) -> Result<()> {
        if let Err(e) = validate_step(weight_grads, bias_grads, layers, &self.velocities) {
            log::warn!("sgd: rejected step {}: {}", self.t + 1, e);
            return Err(e);
        }
        if !self.velocities.is_initialized() {
            log::debug!("sgd: allocating velocities for {} layers", layers.len());
            self.velocities.init_zeros(weight_grads, bias_grads);
        }

        self.t += 1;
        log::trace!("sgd: step {}", self.t);

        let grads = weight_grads.iter().zip(bias_grads);
        for ((v, layer), (w_grad, b_grad)) in self.velocities.iter_mut().zip(layers.iter_mut()).zip(grads) {
            ops::momentum_update(&mut v.weight, w_grad, self.momentum, self.lr);
            ops::momentum_update(&mut v.bias, b_grad, self.momentum, self.lr);
            layer.update(&v.weight, &v.bias);
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
        &self.velocities
    }

    fn check_config(&self) -> Result<()> {
        check_learning_rate(self.lr)?;
        check_momentum(self.momentum)
    }
}
