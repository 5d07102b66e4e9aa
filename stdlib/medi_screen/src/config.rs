//! Deployment configuration: which head is active and where its artifacts live.
//!
//! ```toml
//! mode = "multiclass"
//! model_path = "models/diabetes_final_model.json"
//! features_path = "data/processed/features_used.txt"
//! ```

use crate::dispatch::Mode;
use crate::error::ConfigError;
use crate::schema::SchemaSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MULTICLASS_MODEL: &str = "models/diabetes_final_model.json";
pub const MULTICLASS_FEATURES: &str = "data/processed/features_used.txt";
pub const BINARY_MODEL: &str = "models/diabetes_binary_model.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub mode: Mode,
    pub model_path: PathBuf,
    /// Sidecar feature manifest. Without one the schema comes from the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_path: Option<PathBuf>,
}

impl ScreenConfig {
    /// Standard project layout for `mode` under `project_root`.
    pub fn for_mode(mode: Mode, project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        match mode {
            Mode::Multiclass => Self {
                mode,
                model_path: root.join(MULTICLASS_MODEL),
                features_path: Some(root.join(MULTICLASS_FEATURES)),
            },
            Mode::Binary => Self {
                mode,
                model_path: root.join(BINARY_MODEL),
                features_path: None,
            },
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML config file. Relative artifact paths are taken relative to
    /// the directory holding the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            cfg.model_path = base.join(&cfg.model_path);
            cfg.features_path = cfg.features_path.map(|p| base.join(p));
        }
        Ok(cfg)
    }

    pub fn schema_source(&self) -> SchemaSource {
        match &self.features_path {
            Some(path) => SchemaSource::manifest(path),
            None => SchemaSource::declared_features(),
        }
    }
}
