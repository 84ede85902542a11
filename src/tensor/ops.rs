//! # Tensor Operations
//!
//! In-place elementwise kernels used by the optimizers.
//!
//! Every kernel writes into an existing buffer and never allocates. Shapes are
//! expected to agree; callers validate them first (`ndarray::Zip` panics on a
//! mismatch, which would indicate a bug in that validation).

use super::TensorData;
use ndarray::{ArrayBase, DataMut, Data, Dimension, Zip};

/// Heavy-ball momentum update: `v = momentum * v - lr * g`.
pub fn momentum_update<S, T, D>(
    velocity: &mut ArrayBase<S, D>,
    grad: &ArrayBase<T, D>,
    momentum: TensorData,
    lr: TensorData,
) where
    S: DataMut<Elem = TensorData>,
    T: Data<Elem = TensorData>,
    D: Dimension,
{
    Zip::from(velocity)
        .and(grad)
        .for_each(|v, &g| *v = momentum * *v - lr * g);
}

/// Running sum of squares: `acc += g * g`.
pub fn accumulate_square<S, T, D>(acc: &mut ArrayBase<S, D>, grad: &ArrayBase<T, D>)
where
    S: DataMut<Elem = TensorData>,
    T: Data<Elem = TensorData>,
    D: Dimension,
{
    Zip::from(acc).and(grad).for_each(|a, &g| *a += g * g);
}

/// Adaptive step: `out = -lr * g / sqrt(acc + eps)`.
pub fn adaptive_delta<S, T, U, D>(
    out: &mut ArrayBase<S, D>,
    grad: &ArrayBase<T, D>,
    acc: &ArrayBase<U, D>,
    lr: TensorData,
    eps: TensorData,
) where
    S: DataMut<Elem = TensorData>,
    T: Data<Elem = TensorData>,
    U: Data<Elem = TensorData>,
    D: Dimension,
{
    Zip::from(out)
        .and(grad)
        .and(acc)
        .for_each(|o, &g, &a| *o = -lr * g / (a + eps).sqrt());
}
