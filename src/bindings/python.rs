//! # Python Bindings for RTorch optimizers (`rtorch_optim`)
//!
//! This module uses PyO3 to expose the optimizers and the `Linear` layer to Python.
//! Gradients and parameters cross the boundary as NumPy `float32` arrays.
//!
//! ```python
//! import numpy as np
//! import rtorch_optim as ro
//!
//! layer = ro.Linear(4, 2)
//! opt = ro.SGD(lr=0.1, momentum=0.9)
//! opt.step([np.ones((2, 4), np.float32)], [np.ones(2, np.float32)], [layer])
//! ```

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::nn::Linear;
use crate::optim::adagrad::DEFAULT_EPSILON;
use crate::optim::{Adagrad, OptimError, Optimizer, SGD};
use crate::tensor::{Matrix, TensorData, TensorError, Vector};
use crate::utils::serialization::{self, SerializationError};

// --- Helper to Convert Rust Errors to Python Exceptions ---

impl From<OptimError> for PyErr {
    fn from(err: OptimError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<TensorError> for PyErr {
    fn from(err: TensorError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<SerializationError> for PyErr {
    fn from(err: SerializationError) -> PyErr {
        match err {
            SerializationError::Io(e) => PyIOError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

// --- Layers ---

#[pyclass(name = "Linear")]
#[derive(Debug, Clone)]
struct PyLinear {
    module: Linear,
}

#[pymethods]
impl PyLinear {
    #[new]
    fn new(in_features: usize, out_features: usize) -> Self {
        PyLinear { module: Linear::new(in_features, out_features) }
    }

    /// Builds a layer from existing NumPy parameters.
    #[staticmethod]
    fn from_parts<'py>(
        weight: PyReadonlyArray2<'py, TensorData>,
        bias: PyReadonlyArray1<'py, TensorData>,
    ) -> PyResult<Self> {
        let module = Linear::from_parts(weight.as_array().to_owned(), bias.as_array().to_owned())?;
        Ok(PyLinear { module })
    }

    #[getter]
    fn weight<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<TensorData>> {
        self.module.weight().clone().into_pyarray_bound(py)
    }

    #[getter]
    fn bias<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<TensorData>> {
        self.module.bias().clone().into_pyarray_bound(py)
    }

    #[getter]
    fn in_features(&self) -> usize {
        self.module.in_features()
    }

    #[getter]
    fn out_features(&self) -> usize {
        self.module.out_features()
    }

    fn forward<'py>(
        &self,
        py: Python<'py>,
        input: PyReadonlyArray1<'py, TensorData>,
    ) -> PyResult<Bound<'py, PyArray1<TensorData>>> {
        let out = self.module.forward(&input.as_array().to_owned())?;
        Ok(out.into_pyarray_bound(py))
    }

    fn __repr__(&self) -> String {
        format!("Linear(in_features={}, out_features={})", self.module.in_features(), self.module.out_features())
    }
}

// --- Optimizers ---

/// Copies NumPy gradients into owned arrays and runs one step over the layers.
fn step_layers<'py, O: Optimizer>(
    optimizer: &mut O,
    weight_grads: Vec<PyReadonlyArray2<'py, TensorData>>,
    bias_grads: Vec<PyReadonlyArray1<'py, TensorData>>,
    mut layers: Vec<PyRefMut<'py, PyLinear>>,
) -> PyResult<()> {
    let weight_grads: Vec<Matrix> = weight_grads.iter().map(|g| g.as_array().to_owned()).collect();
    let bias_grads: Vec<Vector> = bias_grads.iter().map(|g| g.as_array().to_owned()).collect();
    let mut modules: Vec<&mut Linear> = layers.iter_mut().map(|l| &mut l.module).collect();
    optimizer.step(&weight_grads, &bias_grads, &mut modules)?;
    Ok(())
}

#[pyclass(name = "SGD")]
#[derive(Debug, Clone)]
struct PySGD {
    optimizer: SGD,
}

#[pymethods]
impl PySGD {
    #[new]
    #[pyo3(signature = (lr, momentum=0.0))]
    fn new(lr: TensorData, momentum: TensorData) -> PyResult<Self> {
        Ok(PySGD { optimizer: SGD::new(lr, momentum)? })
    }

    fn step<'py>(
        &mut self,
        weight_grads: Vec<PyReadonlyArray2<'py, TensorData>>,
        bias_grads: Vec<PyReadonlyArray1<'py, TensorData>>,
        layers: Vec<PyRefMut<'py, PyLinear>>,
    ) -> PyResult<()> {
        step_layers(&mut self.optimizer, weight_grads, bias_grads, layers)
    }

    #[getter]
    fn get_learning_rate(&self) -> TensorData {
        self.optimizer.learning_rate()
    }

    #[setter]
    fn set_learning_rate(&mut self, lr: TensorData) -> PyResult<()> {
        Ok(self.optimizer.set_learning_rate(lr)?)
    }

    #[getter]
    fn momentum(&self) -> TensorData {
        self.optimizer.momentum()
    }

    #[getter]
    fn steps(&self) -> u64 {
        self.optimizer.steps()
    }

    fn save(&self, path: String) -> PyResult<()> {
        Ok(serialization::save_optimizer(&self.optimizer, path)?)
    }

    #[staticmethod]
    fn load(path: String) -> PyResult<Self> {
        Ok(PySGD { optimizer: serialization::load_optimizer(path)? })
    }

    fn __repr__(&self) -> String {
        format!("SGD(lr={}, momentum={})", self.optimizer.learning_rate(), self.optimizer.momentum())
    }
}

#[pyclass(name = "Adagrad")]
#[derive(Debug, Clone)]
struct PyAdagrad {
    optimizer: Adagrad,
}

#[pymethods]
impl PyAdagrad {
    #[new]
    #[pyo3(signature = (lr, eps=DEFAULT_EPSILON))]
    fn new(lr: TensorData, eps: TensorData) -> PyResult<Self> {
        Ok(PyAdagrad { optimizer: Adagrad::new(lr, eps)? })
    }

    fn step<'py>(
        &mut self,
        weight_grads: Vec<PyReadonlyArray2<'py, TensorData>>,
        bias_grads: Vec<PyReadonlyArray1<'py, TensorData>>,
        layers: Vec<PyRefMut<'py, PyLinear>>,
    ) -> PyResult<()> {
        step_layers(&mut self.optimizer, weight_grads, bias_grads, layers)
    }

    #[getter]
    fn get_learning_rate(&self) -> TensorData {
        self.optimizer.learning_rate()
    }

    #[setter]
    fn set_learning_rate(&mut self, lr: TensorData) -> PyResult<()> {
        Ok(self.optimizer.set_learning_rate(lr)?)
    }

    #[getter]
    fn eps(&self) -> TensorData {
        self.optimizer.epsilon()
    }

    #[getter]
    fn steps(&self) -> u64 {
        self.optimizer.steps()
    }

    fn save(&self, path: String) -> PyResult<()> {
        Ok(serialization::save_optimizer(&self.optimizer, path)?)
    }

    #[staticmethod]
    fn load(path: String) -> PyResult<Self> {
        Ok(PyAdagrad { optimizer: serialization::load_optimizer(path)? })
    }

    fn __repr__(&self) -> String {
        format!("Adagrad(lr={}, eps={})", self.optimizer.learning_rate(), self.optimizer.epsilon())
    }
}

// --- Main Python Module Definition (`rtorch_optim`) ---
#[pymodule]
fn rtorch_optim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLinear>()?;
    m.add_class::<PySGD>()?;
    m.add_class::<PyAdagrad>()?;
    Ok(())
}
