//! Model inference boundary.
//!
//! The pipeline never looks inside the model: it hands over a batch of
//! normalized crops and expects one probability crop of identical shape
//! per input, index-aligned. Anything satisfying [`CropModel`] plugs in;
//! the `onnx` feature provides an ONNX Runtime session adapter.

pub mod normalize;
#[cfg(feature = "onnx")]
pub mod onnx;

use crate::volume::VolumeF32;

pub use normalize::normalize_crop;
#[cfg(feature = "onnx")]
pub use onnx::{Device, OnnxCropModel};

/// Reasons why inference may fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// Backend-reported failure (session setup, run, tensor extraction).
    Inference(String),
    /// The model returned a different number of crops than it was given.
    BatchLengthMismatch { expected: usize, got: usize },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Inference(msg) => write!(f, "inference failed: {msg}"),
            ModelError::BatchLengthMismatch { expected, got } => write!(
                f,
                "model returned {got} crops for a batch of {expected}"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// A trained model mapping normalized crops to per-sample probabilities.
///
/// Implementations must return exactly one output crop per input, in input
/// order, each with the input's shape. The pipeline treats any error as
/// fatal; there is no retry.
pub trait CropModel {
    fn predict(&mut self, batch: &[VolumeF32]) -> Result<Vec<VolumeF32>, ModelError>;
}
