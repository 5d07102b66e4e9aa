//! Turns the classifier's probability distribution into a screening result.

use crate::assembler::FeatureRecord;
use crate::error::InferenceError;
use crate::oracle::Oracle;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability at or above which the binary head reports a risk.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Index of the positive class in a binary distribution. Assumes the model
/// orders its classes as `[no risk, risk]`.
pub const POSITIVE_CLASS: usize = 1;

/// Classes the multi-class head must score. Longer distributions are
/// accepted and report their extra classes as unknown.
pub const MULTICLASS_CLASSES: usize = 3;

/// Which classification head the deployed model has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No diabetes / pre-diabetes / diabetes.
    Multiclass,
    /// No risk / risk (pre-diabetes or diabetes).
    Binary,
}

/// Class of the multi-class head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiabetesClass {
    NoDiabetes,
    PreDiabetes,
    Diabetes,
    Unknown(usize),
}

impl DiabetesClass {
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => DiabetesClass::NoDiabetes,
            1 => DiabetesClass::PreDiabetes,
            2 => DiabetesClass::Diabetes,
            other => DiabetesClass::Unknown(other),
        }
    }

    pub fn index(self) -> usize {
        match self {
            DiabetesClass::NoDiabetes => 0,
            DiabetesClass::PreDiabetes => 1,
            DiabetesClass::Diabetes => 2,
            DiabetesClass::Unknown(idx) => idx,
        }
    }
}

impl fmt::Display for DiabetesClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiabetesClass::NoDiabetes => f.write_str("no diabetes"),
            DiabetesClass::PreDiabetes => f.write_str("pre-diabetes"),
            DiabetesClass::Diabetes => f.write_str("diabetes"),
            DiabetesClass::Unknown(idx) => write!(f, "unknown class {idx}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDecision {
    NoRisk,
    AtRisk,
}

impl fmt::Display for RiskDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskDecision::NoRisk => f.write_str("no diabetes risk"),
            RiskDecision::AtRisk => f.write_str("diabetes risk (pre-diabetes or diabetes)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MulticlassPrediction {
    pub class_id: usize,
    pub probabilities: Vec<f64>,
}

impl MulticlassPrediction {
    pub fn class(&self) -> DiabetesClass {
        DiabetesClass::from_index(self.class_id)
    }

    /// Probabilities scaled to percent.
    pub fn percentages(&self) -> Vec<f64> {
        self.probabilities.iter().map(|p| p * 100.0).collect()
    }
}

impl fmt::Display for MulticlassPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())?;
        for (idx, pct) in self.percentages().into_iter().enumerate() {
            let sep = if idx == 0 { " (" } else { ", " };
            write!(f, "{sep}{}: {pct:.1} %", DiabetesClass::from_index(idx))?;
        }
        if !self.probabilities.is_empty() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryPrediction {
    /// Probability of the positive (risk) class.
    pub probability: f64,
    pub decision: RiskDecision,
}

impl BinaryPrediction {
    pub fn from_probability(probability: f64) -> Self {
        let decision = if probability >= POSITIVE_THRESHOLD {
            RiskDecision::AtRisk
        } else {
            RiskDecision::NoRisk
        };
        Self {
            probability,
            decision,
        }
    }

    pub fn percentage(&self) -> f64 {
        self.probability * 100.0
    }
}

impl fmt::Display for BinaryPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (risk probability {:.1} %)",
            self.decision,
            self.percentage()
        )
    }
}

/// Outcome of one screening request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PredictionResult {
    Multiclass(MulticlassPrediction),
    Binary(BinaryPrediction),
}

impl PredictionResult {
    /// Predicted class index: the arg-max class, or 0/1 for the binary head.
    pub fn class_id(&self) -> usize {
        match self {
            PredictionResult::Multiclass(m) => m.class_id,
            PredictionResult::Binary(b) => match b.decision {
                RiskDecision::NoRisk => 0,
                RiskDecision::AtRisk => 1,
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            PredictionResult::Multiclass(m) => m.class().to_string(),
            PredictionResult::Binary(b) => b.decision.to_string(),
        }
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionResult::Multiclass(m) => write!(f, "{m}"),
            PredictionResult::Binary(b) => write!(f, "{b}"),
        }
    }
}

/// Index of the largest probability; the lowest index wins ties.
///
/// A NaN compares above everything, so the first NaN is selected wherever it
/// sits.
pub fn argmax(probabilities: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &p) in probabilities.iter().enumerate() {
        if p.is_nan() {
            return Some(idx);
        }
        if best.map_or(true, |(_, top)| p > top) {
            best = Some((idx, p));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Run `oracle` on `record` and interpret the distribution for `mode`.
pub fn predict(
    oracle: &dyn Oracle,
    record: &FeatureRecord,
    mode: Mode,
) -> Result<PredictionResult, InferenceError> {
    let probabilities = oracle.predict_proba(record).map_err(|err| {
        error!("model '{}' rejected the record: {err}", oracle.name());
        err
    })?;

    match mode {
        Mode::Multiclass => {
            let class_id = argmax(&probabilities).ok_or(InferenceError::EmptyDistribution)?;
            if probabilities.len() < MULTICLASS_CLASSES {
                error!(
                    "model '{}' scored {} classes, expected {MULTICLASS_CLASSES}",
                    oracle.name(),
                    probabilities.len()
                );
                return Err(InferenceError::IncompleteDistribution {
                    expected: MULTICLASS_CLASSES,
                    len: probabilities.len(),
                });
            }
            if let DiabetesClass::Unknown(idx) = DiabetesClass::from_index(class_id) {
                warn!("model '{}' predicted unknown class {idx}", oracle.name());
            }
            Ok(PredictionResult::Multiclass(MulticlassPrediction {
                class_id,
                probabilities,
            }))
        }
        Mode::Binary => {
            let probability = probabilities.get(POSITIVE_CLASS).copied().ok_or(
                InferenceError::MissingPositiveClass {
                    len: probabilities.len(),
                },
            )?;
            Ok(PredictionResult::Binary(BinaryPrediction::from_probability(
                probability,
            )))
        }
    }
}
