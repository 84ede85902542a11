//! # RTorch Optimizers
//!
//! This crate provides the optimizer core of RTorch: per-layer optimizer state
//! and the update rules (momentum SGD, Adagrad) that turn raw gradients into
//! deltas applied to a sequence of layers.
//! It's designed to be used both directly in Rust and via Python bindings
//! (cargo feature `python`).
//!
//! ```
//! use ndarray::array;
//! use rtorch_optim::nn::Linear;
//! use rtorch_optim::optim::{Optimizer, SGD};
//!
//! let mut layers = vec![Linear::zeros(2, 1)];
//! let mut opt = SGD::new(0.1, 0.9).unwrap();
//! opt.step(&[array![[1.0, -1.0]]], &[array![0.5]], &mut layers).unwrap();
//! assert_eq!(layers[0].bias()[0], -0.05);
//! ```

pub mod tensor;
pub mod nn;
pub mod optim;
pub mod utils;
#[cfg(feature = "python")]
pub mod bindings; // Module specifically for PyO3 bindings setup

pub mod prelude {
    pub use crate::nn::{Layer, Linear};
    pub use crate::optim::{Adagrad, Optim, OptimError, Optimizer, OptimizerConfig, SGD};
    pub use crate::tensor::{Matrix, TensorData, Vector};
}
