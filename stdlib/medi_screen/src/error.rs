//! Error types for startup configuration and per-request inference.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading artifacts or resolving the expected schema.
///
/// These are fatal at startup: a screener is never built when one occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Model artifact not found: {0}")]
    ModelMissing(PathBuf),
    #[error("Model artifact could not be read: {path}")]
    ModelUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Model artifact is malformed: {path}")]
    ModelMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Model '{model}' is inconsistent: {reason}")]
    InvalidModel { model: String, reason: String },
    #[error("Feature manifest not found: {0}")]
    ManifestMissing(PathBuf),
    #[error("Feature manifest could not be read: {path}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Model '{model}' does not declare its input features")]
    NoDeclaredFeatures { model: String },
    #[error("Expected schema is empty")]
    EmptySchema,
    #[error("Blank feature name at position {position}")]
    BlankFeatureName { position: usize },
    #[error("Duplicate feature name in schema: {0}")]
    DuplicateFeature(String),
    #[error("Config file could not be read: {path}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Errors raised while running the classifier on an assembled record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Feature names do not match the fitted model: expected {expected:?}, found {found:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Expected {expected} features, got {found}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("Model returned an empty probability distribution")]
    EmptyDistribution,
    #[error("Multi-class head needs {expected} class probabilities, distribution has {len} entries")]
    IncompleteDistribution { expected: usize, len: usize },
    #[error("Binary head needs a positive-class probability at index 1, distribution has {len} entries")]
    MissingPositiveClass { len: usize },
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Umbrella error for callers that drive startup and prediction in one flow.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
