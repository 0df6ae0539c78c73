//! Model-path inference: tensor shaping and probability extraction.

use super::loader::ModelHandle;
use super::InferenceBackend;
use anyhow::{anyhow, bail, Context, Result};
use ort::value::Tensor;
use tracing::debug;

/// CNN input shape over the 64-slot feature vector (an 8x8 single-channel
/// grid).
const INPUT_SHAPE: [i64; 4] = [1, 8, 8, 1];

impl ModelHandle {
    /// Score one extracted feature vector.
    ///
    /// Applies the scaler, runs the session and extracts the scalar fraud
    /// probability. Any failure here is reported to the dispatcher, which
    /// degrades that single call to the rule path.
    pub fn infer(&self, features: &[f32]) -> Result<f64> {
        let scaled = self.scaler.apply(features);

        let input = Tensor::from_array((INPUT_SHAPE.to_vec(), scaled))
            .context("Failed to build input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Model session lock poisoned: {e}"))?;

        let outputs = session.run(ort::inputs![&self.input_name => input])?;
        let probability = extract_probability(&outputs, &self.output_name)?;

        debug!(probability, "Model inference complete");
        Ok(probability)
    }
}

impl InferenceBackend for ModelHandle {
    fn infer(&self, features: &[f32]) -> Result<f64> {
        ModelHandle::infer(self, features)
    }
}

/// Pull the fraud probability out of the session outputs.
///
/// Prefers the named probability output, then falls back to the first float
/// tensor that is not a label output.
fn extract_probability(outputs: &ort::session::SessionOutputs, output_name: &str) -> Result<f64> {
    if let Some(output) = outputs.get(output_name) {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            return probability_from_tensor(&shape, data);
        }
    }

    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            return probability_from_tensor(&shape, data);
        }
    }

    bail!("No float tensor output found on model")
}

/// Interpret the output tensor: `[1, 1]` sigmoid scalar, or `[1, 2]`
/// two-class softmax with class 1 = fraud.
fn probability_from_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Result<f64> {
    if data.is_empty() {
        bail!("Empty output tensor");
    }

    let dims: Vec<i64> = shape.iter().copied().collect();

    let value = match dims.as_slice() {
        [_, classes] if *classes >= 2 => data[1],
        [_, 1] => data[0],
        [classes] if *classes >= 2 => data[1],
        [1] => data[0],
        _ => data[data.len() - 1],
    };

    Ok(f64::from(value))
}
