//! Learned-model scoring path

pub mod inference;
pub mod loader;

pub use loader::{FeatureScaler, ModelHandle};

use anyhow::Result;

/// Seam between the dispatcher and the learned model.
///
/// The production implementation is [`ModelHandle`]; tests exercise the
/// dispatch and fallback logic with stub backends.
pub trait InferenceBackend: Send + Sync {
    /// Score an extracted feature vector, returning a fraud probability.
    fn infer(&self, features: &[f32]) -> Result<f64>;
}
