//! One-time startup plus the per-request screening pipeline.

use crate::answers::RawAnswers;
use crate::assembler::{assemble, FeatureRecord};
use crate::config::ScreenConfig;
use crate::derived::derive;
use crate::dispatch::{predict, Mode, PredictionResult};
use crate::error::{ConfigError, InferenceError};
use crate::oracle::{LinearClassifier, Oracle};
use crate::schema::ExpectedSchema;
use log::{debug, info};
use std::sync::Arc;

/// Loaded model and resolved schema, immutable after construction.
///
/// Share it across requests by reference or by cloning; clones share the
/// same oracle and schema.
#[derive(Clone)]
pub struct Screener {
    schema: ExpectedSchema,
    oracle: Arc<dyn Oracle>,
    mode: Mode,
}

impl std::fmt::Debug for Screener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screener")
            .field("model", &self.oracle.name())
            .field("mode", &self.mode)
            .field("features", &self.schema.len())
            .finish()
    }
}

impl Screener {
    pub fn new(schema: ExpectedSchema, oracle: Arc<dyn Oracle>, mode: Mode) -> Self {
        Self {
            schema,
            oracle,
            mode,
        }
    }

    /// Load the model and resolve the schema described by `config`.
    pub fn initialize(config: &ScreenConfig) -> Result<Self, ConfigError> {
        let model = LinearClassifier::load(&config.model_path)?;
        info!(
            "loaded model '{}' from {} ({} classes)",
            model.model_name,
            config.model_path.display(),
            model.n_classes()
        );
        Self::with_oracle(config, Arc::new(model))
    }

    /// Resolve the schema for an already loaded oracle.
    pub fn with_oracle(
        config: &ScreenConfig,
        oracle: Arc<dyn Oracle>,
    ) -> Result<Self, ConfigError> {
        let schema = config.schema_source().resolve(oracle.as_ref())?;
        info!("screener ready: mode {:?}, schema {schema}", config.mode);
        Ok(Self::new(schema, oracle, config.mode))
    }

    pub fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn oracle(&self) -> &dyn Oracle {
        self.oracle.as_ref()
    }

    /// Record the model will see for `raw`: answers plus schema-gated derived
    /// features, aligned to the schema.
    pub fn record_for(&self, raw: &RawAnswers) -> FeatureRecord {
        let mut values = raw.base_values();
        values.extend(derive(&self.schema, raw));
        assemble(&self.schema, &values)
    }

    pub fn screen(&self, raw: &RawAnswers) -> Result<PredictionResult, InferenceError> {
        let record = self.record_for(raw);
        let result = predict(self.oracle.as_ref(), &record, self.mode)?;
        debug!("screening result: {result}");
        Ok(result)
    }
}
