//! # Neural Network Layer Modules
//!
//! Concrete layers implementing [`Layer`](crate::nn::Layer).

// --- Re-export Layer Implementations ---
pub mod linear;
pub use linear::Linear;
