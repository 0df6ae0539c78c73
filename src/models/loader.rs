//! Model artifact loading: ONNX graph + feature scaler.

use crate::config::ModelConfig;
use crate::feature_extractor::FEATURE_COUNT;
use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// Per-feature standardization parameters fitted at training time.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl FeatureScaler {
    /// Parse and validate scaler parameters from their JSON form.
    pub fn from_json(raw: &str) -> Result<Self> {
        let scaler: FeatureScaler =
            serde_json::from_str(raw).context("Failed to parse scaler parameters")?;

        if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
            bail!(
                "Scaler parameter length mismatch: mean={}, scale={}, expected {}",
                scaler.mean.len(),
                scaler.scale.len(),
                FEATURE_COUNT
            );
        }

        Ok(scaler)
    }

    /// Load scaler parameters from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler parameters from {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Apply standardization element-wise: `(x - mean) / scale`.
    ///
    /// Zero scale entries (constant training features) pass the centered
    /// value through, keeping the transform total.
    pub fn apply(&self, features: &[f32]) -> Vec<f32> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect()
    }
}

/// Loaded inference state: the ONNX session plus its scaler and tensor
/// names.
///
/// Established once at startup and never mutated; the mutex exists only
/// because ONNX Runtime requires exclusive access for a `run` call.
pub struct ModelHandle {
    pub(crate) session: Mutex<Session>,
    pub(crate) scaler: FeatureScaler,
    pub(crate) input_name: String,
    pub(crate) output_name: String,
}

impl ModelHandle {
    /// Load both model artifacts.
    ///
    /// Absence of either file is not an error: it is the documented trigger
    /// for rule-based scoring for the lifetime of the process. Load and
    /// validation failures degrade the same way, with a warning.
    pub fn load(config: &ModelConfig) -> Option<Self> {
        let model_path = Path::new(&config.model_path);
        let scaler_path = Path::new(&config.scaler_path);

        if !model_path.exists() || !scaler_path.exists() {
            info!(
                model = %model_path.display(),
                scaler = %scaler_path.display(),
                "Model artifacts not found; using rule-based detection"
            );
            return None;
        }

        match Self::try_load(config) {
            Ok(handle) => {
                info!(
                    model = %model_path.display(),
                    input = %handle.input_name,
                    output = %handle.output_name,
                    "Fraud detection model loaded"
                );
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load model; using rule-based detection");
                None
            }
        }
    }

    fn try_load(config: &ModelConfig) -> Result<Self> {
        ort::init().commit()?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.onnx_threads)?
            .commit_from_file(&config.model_path)
            .with_context(|| format!("Failed to load model from {}", config.model_path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "output".to_string())
            });

        let scaler = FeatureScaler::load(&config.scaler_path)?;

        Ok(Self {
            session: Mutex::new(session),
            scaler,
            input_name,
            output_name,
        })
    }
}
