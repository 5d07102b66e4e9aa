//! Diabetes risk screening for Medi
//!
//! Turns one questionnaire submission into a schema-conformant feature record
//! for a fitted classifier and interprets the classifier's output, for either
//! a three-class head (no diabetes / pre-diabetes / diabetes) or a binary risk
//! head.
//!
//! Pipeline: [`RawAnswers`] -> [`derive()`] (schema-gated) -> [`assemble`] ->
//! [`predict`] -> [`PredictionResult`]. [`Screener`] wires the steps together
//! after a one-time load of the model and its expected schema.

pub mod answers;
pub mod assembler;
pub mod config;
pub mod derived;
pub mod dispatch;
pub mod error;
pub mod oracle;
pub mod schema;
pub mod screener;

pub use answers::{age_band_code, bmi_from, OptionalAnswers, RawAnswers, Sex, SmokingStatus};
pub use assembler::{assemble, FeatureMap, FeatureRecord, FeatureValue};
pub use config::ScreenConfig;
pub use derived::{derive, DerivedFeature};
pub use dispatch::{
    argmax, predict, BinaryPrediction, DiabetesClass, Mode, MulticlassPrediction,
    PredictionResult, RiskDecision, MULTICLASS_CLASSES, POSITIVE_THRESHOLD,
};
pub use error::{ConfigError, InferenceError, ScreenError};
pub use oracle::{LinearClassifier, Oracle};
pub use schema::{ExpectedSchema, SchemaOrigin, SchemaSource};
pub use screener::Screener;
