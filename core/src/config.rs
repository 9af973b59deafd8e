use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Query-time limits shared by every front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest accepted query, counted in whitespace-separated terms.
    pub max_query_terms: usize,
    pub default_top_k: usize,
    pub max_top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_query_terms: 256, default_top_k: 5, max_top_k: 20 }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path).map_err(|source| CoreError::Io { path: path.to_path_buf(), source })?;
        let mut buf = String::new();
        f.read_to_string(&mut buf).map_err(|source| CoreError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&buf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_query_terms == 0 {
            return Err(CoreError::Config("max_query_terms must be at least 1".into()));
        }
        if self.max_top_k == 0 {
            return Err(CoreError::Config("max_top_k must be at least 1".into()));
        }
        if self.default_top_k == 0 || self.default_top_k > self.max_top_k {
            return Err(CoreError::Config(format!(
                "default_top_k must be between 1 and max_top_k ({})",
                self.max_top_k
            )));
        }
        Ok(())
    }

    /// Clamp a requested result count into `[1, max_top_k]`; `None` picks the default.
    pub fn clamp_top_k(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_top_k).max(1).min(self.max_top_k)
    }
}
