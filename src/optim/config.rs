//! # Optimizer Configuration
//!
//! Plain-data descriptions of an optimizer, suitable for loading from a
//! training config with any `serde` format and turning into a live optimizer.

use super::adagrad::DEFAULT_EPSILON;
use super::{check_epsilon, check_learning_rate, check_momentum, Adagrad, Optim, Result, SGD};
use crate::tensor::TensorData;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEARNING_RATE: TensorData = 1e-2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    pub learning_rate: TensorData,
    pub momentum: TensorData,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: 0.0,
        }
    }
}

impl SgdConfig {
    pub fn validate(&self) -> Result<()> {
        check_learning_rate(self.learning_rate)?;
        check_momentum(self.momentum)
    }

    pub fn build(&self) -> Result<SGD> {
        SGD::new(self.learning_rate, self.momentum)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdagradConfig {
    pub learning_rate: TensorData,
    pub epsilon: TensorData,
}

impl Default for AdagradConfig {
    fn default() -> Self {
        AdagradConfig {
            learning_rate: DEFAULT_LEARNING_RATE,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl AdagradConfig {
    pub fn validate(&self) -> Result<()> {
        check_learning_rate(self.learning_rate)?;
        check_epsilon(self.epsilon)
    }

    pub fn build(&self) -> Result<Adagrad> {
        Adagrad::new(self.learning_rate, self.epsilon)
    }
}

/// Selects the optimizer variant and its hyper-parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerConfig {
    Sgd(SgdConfig),
    Adagrad(AdagradConfig),
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::Sgd(SgdConfig::default())
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            OptimizerConfig::Sgd(cfg) => cfg.validate(),
            OptimizerConfig::Adagrad(cfg) => cfg.validate(),
        }
    }

    pub fn build(&self) -> Result<Optim> {
        let opt = match self {
            OptimizerConfig::Sgd(cfg) => Optim::Sgd(cfg.build()?),
            OptimizerConfig::Adagrad(cfg) => Optim::Adagrad(cfg.build()?),
        };
        log::debug!("built {} optimizer from {:?}", opt.name(), self);
        Ok(opt)
    }
}

impl From<SgdConfig> for OptimizerConfig {
    fn from(cfg: SgdConfig) -> Self {
        OptimizerConfig::Sgd(cfg)
    }
}

impl From<AdagradConfig> for OptimizerConfig {
    fn from(cfg: AdagradConfig) -> Self {
        OptimizerConfig::Adagrad(cfg)
    }
}
