//! Expected feature schema and where it comes from.
//!
//! The multi-class deployment ships a sidecar manifest (one feature name per
//! line); the binary deployment reads the names the fitted model declares.

use crate::error::ConfigError;
use crate::oracle::Oracle;
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

#[derive(Debug)]
struct SchemaInner {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

/// Ordered, unique, non-empty list of the feature names a model was fit on.
///
/// Cloning is cheap; every record assembled against a schema shares it.
#[derive(Debug, Clone)]
pub struct ExpectedSchema {
    inner: Arc<SchemaInner>,
}

impl ExpectedSchema {
    pub fn new(names: Vec<String>) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::BlankFeatureName { position });
            }
            if index.insert(name.clone(), position).is_some() {
                return Err(ConfigError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self {
            inner: Arc::new(SchemaInner { names, index }),
        })
    }

    /// Parse a manifest: one name per line, surrounding whitespace trimmed,
    /// blank lines skipped.
    pub fn parse_manifest(text: &str) -> Result<Self, ConfigError> {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.inner.index.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.names.iter().map(String::as_str)
    }
}

impl PartialEq for ExpectedSchema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.names == other.inner.names
    }
}

impl Eq for ExpectedSchema {}

impl fmt::Display for ExpectedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.inner.names.join(", "))
    }
}

/// Where the expected schema is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Sidecar manifest file. The model's declared features are used when the
    /// file is absent.
    Manifest(PathBuf),
    /// The names the fitted model declares.
    DeclaredFeatures,
}

/// Resolves the expected schema once and hands out the same value afterwards.
#[derive(Debug)]
pub struct SchemaSource {
    origin: SchemaOrigin,
    resolved: OnceLock<ExpectedSchema>,
}

impl SchemaSource {
    pub fn new(origin: SchemaOrigin) -> Self {
        Self {
            origin,
            resolved: OnceLock::new(),
        }
    }

    pub fn manifest(path: impl Into<PathBuf>) -> Self {
        Self::new(SchemaOrigin::Manifest(path.into()))
    }

    pub fn declared_features() -> Self {
        Self::new(SchemaOrigin::DeclaredFeatures)
    }

    pub fn origin(&self) -> &SchemaOrigin {
        &self.origin
    }

    /// Resolve the schema. The first successful call reads the artifact;
    /// later calls return the cached sequence.
    pub fn resolve(&self, oracle: &dyn Oracle) -> Result<ExpectedSchema, ConfigError> {
        if let Some(schema) = self.resolved.get() {
            return Ok(schema.clone());
        }
        let schema = match &self.origin {
            SchemaOrigin::Manifest(path) => match read_manifest(path)? {
                Some(schema) => schema,
                None => {
                    warn!(
                        "feature manifest {} not found, falling back to features declared by '{}'",
                        path.display(),
                        oracle.name()
                    );
                    from_declared(oracle).map_err(|err| match err {
                        ConfigError::NoDeclaredFeatures { .. } => {
                            ConfigError::ManifestMissing(path.clone())
                        }
                        other => other,
                    })?
                }
            },
            SchemaOrigin::DeclaredFeatures => from_declared(oracle)?,
        };
        info!("resolved expected schema with {} features", schema.len());
        Ok(self.resolved.get_or_init(|| schema).clone())
    }
}

fn read_manifest(path: &Path) -> Result<Option<ExpectedSchema>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => ExpectedSchema::parse_manifest(&text).map(Some),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn from_declared(oracle: &dyn Oracle) -> Result<ExpectedSchema, ConfigError> {
    let names = oracle
        .feature_names_in()
        .ok_or_else(|| ConfigError::NoDeclaredFeatures {
            model: oracle.name().to_string(),
        })?;
    ExpectedSchema::new(names.to_vec())
}
