//! # Utility Functions (`utils`)
//!
//! Provides helper functions for checkpointing optimizer state.

pub mod serialization;

pub use serialization::{load_optimizer, save_optimizer, SerializationError};
