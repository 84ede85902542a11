//! # Bindings
//!
//! Foreign-language front ends. Only compiled with the `python` feature.

pub mod python;
