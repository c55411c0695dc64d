//! JSON-loaded feed-forward classifier.
//!
//! The weight file is exported by the training side. Loading validates every
//! dimension against the category list and the feature width, so a model
//! trained for a different front-end fails at startup instead of mid-stream.

use super::{Classifier, Emotion};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LayerSpec {
    /// Row-major `[outputs][inputs]` weight matrix.
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ModelSpec {
    labels: Vec<String>,
    layers: Vec<LayerSpec>,
}

/// Small dense network: ReLU hidden layers, softmax output. Loaded once at
/// startup and shared read-only for the lifetime of the session.
pub struct DenseModel {
    layers: Vec<LayerSpec>,
    input_len: usize,
}

impl DenseModel {
    /// Reads and validates a weight file. `expected_input` is the feature
    /// width the front-end will produce.
    pub fn load(path: &Path, expected_input: usize) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            Error::Configuration(format!(
                "failed to read model file '{}': {err}",
                path.display()
            ))
        })?;
        let spec: ModelSpec = serde_json::from_str(&raw).map_err(|err| {
            Error::Configuration(format!(
                "failed to parse model file '{}': {err}",
                path.display()
            ))
        })?;
        Self::from_spec(spec, expected_input)
    }

    fn from_spec(spec: ModelSpec, expected_input: usize) -> Result<Self> {
        let expected_labels: Vec<&str> = Emotion::ALL.iter().map(|e| e.label()).collect();
        if spec.labels != expected_labels {
            return Err(Error::Configuration(format!(
                "model labels {:?} do not match the category list {:?}",
                spec.labels, expected_labels
            )));
        }
        if spec.layers.is_empty() {
            return Err(Error::Configuration("model has no layers".into()));
        }

        let mut width = expected_input;
        for (index, layer) in spec.layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(Error::Configuration(format!(
                    "layer {index} has no output rows"
                )));
            }
            for row in &layer.weights {
                if row.len() != width {
                    return Err(Error::Configuration(format!(
                        "layer {index} expects {width} inputs, found a row of {}",
                        row.len()
                    )));
                }
            }
            if layer.bias.len() != layer.weights.len() {
                return Err(Error::Configuration(format!(
                    "layer {index} has {} bias terms for {} outputs",
                    layer.bias.len(),
                    layer.weights.len()
                )));
            }
            width = layer.weights.len();
        }
        if width != Emotion::COUNT {
            return Err(Error::Configuration(format!(
                "model produces {width} outputs for {} categories",
                Emotion::COUNT
            )));
        }

        Ok(Self {
            layers: spec.layers,
            input_len: expected_input,
        })
    }
}

impl Classifier for DenseModel {
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.input_len {
            return Err(Error::InvalidInput(format!(
                "expected {} features, got {}",
                self.input_len,
                features.len()
            )));
        }

        let mut activation = features.to_vec();
        let last = self.layers.len() - 1;
        for (index, layer) in self.layers.iter().enumerate() {
            let mut next = Vec::with_capacity(layer.bias.len());
            for (row, &bias) in layer.weights.iter().zip(&layer.bias) {
                let mut sum = bias;
                for (w, a) in row.iter().zip(&activation) {
                    sum += w * a;
                }
                next.push(if index < last { sum.max(0.0) } else { sum });
            }
            activation = next;
        }

        softmax_in_place(&mut activation);
        Ok(activation)
    }

    fn name(&self) -> &'static str {
        "dense_json"
    }
}

fn softmax_in_place(scores: &mut [f32]) {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut total = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        total += *s;
    }
    for s in scores.iter_mut() {
        *s /= total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_spec() -> ModelSpec {
        // 4 inputs straight through to 4 outputs.
        ModelSpec {
            labels: vec![
                "Angry".into(),
                "Happy".into(),
                "Sad".into(),
                "Neutral".into(),
            ],
            layers: vec![LayerSpec {
                weights: (0..4)
                    .map(|i| (0..4).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
                    .collect(),
                bias: vec![0.0; 4],
            }],
        }
    }

    #[test]
    fn predict_returns_softmax_over_categories() {
        let model = DenseModel::from_spec(identity_spec(), 4).unwrap();
        let scores = model.predict(&[0.0, 4.0, 0.0, 0.0]).unwrap();
        assert_eq!(scores.len(), Emotion::COUNT);
        let total: f32 = scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(scores[1] > scores[0]);
    }

    #[test]
    fn wrong_feature_length_is_invalid_input() {
        let model = DenseModel::from_spec(identity_spec(), 4).unwrap();
        let err = model.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn rejects_mismatched_labels() {
        let mut spec = identity_spec();
        spec.labels[0] = "Furious".into();
        assert!(matches!(
            DenseModel::from_spec(spec, 4),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_mismatched_input_width() {
        let spec = identity_spec();
        assert!(matches!(
            DenseModel::from_spec(spec, 13),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_bias_row_mismatch() {
        let mut spec = identity_spec();
        spec.layers[0].bias.pop();
        assert!(matches!(
            DenseModel::from_spec(spec, 4),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn loads_from_json_text() {
        let json = r#"{
            "labels": ["Angry", "Happy", "Sad", "Neutral"],
            "layers": [
                {
                    "weights": [[1.0, 0.0], [0.0, 1.0], [0.5, 0.5], [0.0, 0.0]],
                    "bias": [0.0, 0.0, 0.0, 0.1]
                }
            ]
        }"#;
        let spec: ModelSpec = serde_json::from_str(json).unwrap();
        let model = DenseModel::from_spec(spec, 2).unwrap();
        let scores = model.predict(&[1.0, -1.0]).unwrap();
        assert_eq!(scores.len(), 4);
    }
}
