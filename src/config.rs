//! Run configuration, loaded from YAML
//!
//! ```yaml
//! mode: training        # or evaluation
//! workers: 8
//! lexicon: /data/wordnet_synonyms.json
//! cache_synonyms: true
//! coco_only: true
//! ```
//!
//! Every field is optional. CLI flags override file values.

use crate::align::AlignMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub mode: AlignMode,
    /// Phrases aligned concurrently; `0` is treated as `1`
    pub workers: usize,
    /// Synonym lexicon file; without one only exact matching resolves
    pub lexicon: Option<PathBuf>,
    /// Memoize oracle lookups across phrases
    pub cache_synonyms: bool,
    /// Visual Genome builder: keep only images with a COCO id
    pub coco_only: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            mode: AlignMode::Training,
            workers: std::thread::available_parallelism().map_or(4, |n| n.get()),
            lexicon: None,
            cache_synonyms: true,
            coco_only: true,
        }
    }
}

impl AlignConfig {
    /// `<config_dir>/scenealign/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scenealign").join("config.yaml"))
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        // An empty document deserializes as unit, not as a mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn with_mode(mut self, mode: AlignMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_lexicon(mut self, lexicon: impl Into<PathBuf>) -> Self {
        self.lexicon = Some(lexicon.into());
        self
    }

    pub fn with_coco_only(mut self, coco_only: bool) -> Self {
        self.coco_only = coco_only;
        self
    }

    /// Effective worker count
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }
}
