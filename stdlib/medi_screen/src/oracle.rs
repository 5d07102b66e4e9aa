//! Classifier seam and a serialized linear classifier.

use crate::assembler::FeatureRecord;
use crate::error::{ConfigError, InferenceError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fitted classifier, treated as a black box.
///
/// Implementations are shared read-only across requests, hence `Send + Sync`.
pub trait Oracle: Send + Sync {
    /// Identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Probability distribution over classes for a single record.
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError>;

    /// Feature names, in order, the model was fit on, if it records them.
    fn feature_names_in(&self) -> Option<&[String]> {
        None
    }
}

/// Linear classifier with a logistic head (one coefficient row) or a softmax
/// head (one row per class), loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    pub fn new(
        model_name: impl Into<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        let model = Self {
            model_name: model_name.into(),
            feature_names_in: None,
            coefficients,
            intercepts,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        self.feature_names_in = Some(names);
        self.validate()?;
        Ok(self)
    }

    /// Load a model artifact written with `serde_json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::ModelMissing(path.to_path_buf())
            } else {
                ConfigError::ModelUnreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let model: Self =
            serde_json::from_str(&text).map_err(|source| ConfigError::ModelMalformed {
                path: path.to_path_buf(),
                source,
            })?;
        model.validate()?;
        Ok(model)
    }

    /// Number of classes in the output distribution.
    pub fn n_classes(&self) -> usize {
        match self.coefficients.len() {
            1 => 2,
            k => k,
        }
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidModel {
            model: self.model_name.clone(),
            reason,
        };
        if self.coefficients.is_empty() {
            return Err(invalid("no coefficient rows".into()));
        }
        if self.coefficients.len() != self.intercepts.len() {
            return Err(invalid(format!(
                "{} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        let width = self.n_features();
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err(invalid("coefficient rows differ in length".into()));
        }
        if let Some(names) = &self.feature_names_in {
            if names.len() != width {
                return Err(invalid(format!(
                    "{} declared features but {width} coefficients per row",
                    names.len()
                )));
            }
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Oracle for LinearClassifier {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError> {
        if let Some(expected) = &self.feature_names_in {
            if record.names() != expected.as_slice() {
                return Err(InferenceError::FeatureMismatch {
                    expected: expected.clone(),
                    found: record.names().to_vec(),
                });
            }
        }
        let row = record.to_row();
        if row.len() != self.n_features() {
            return Err(InferenceError::WidthMismatch {
                expected: self.n_features(),
                found: row.len(),
            });
        }
        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, bias)| {
                weights.iter().zip(&row).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect();

        match logits.as_slice() {
            [z] => {
                let p = sigmoid(*z);
                Ok(vec![1.0 - p, p])
            }
            many => Ok(softmax(many)),
        }
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }
}
