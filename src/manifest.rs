//! Build Manifest - what a run wrote, with hashes
//!
//! Lets a later run (or a deploy step) check that artifacts are unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::canonical::{canonical_pretty, sha256_hex};
use crate::error::{BuildError, BuildResult};
use crate::GENERATOR_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

impl Artifact {
    pub fn from_bytes(path: impl Into<PathBuf>, data: &[u8]) -> Self {
        Self {
            path: path.into(),
            bytes: data.len() as u64,
            sha256: sha256_hex(data),
        }
    }

    /// Hash a file some other process wrote.
    pub fn from_file(path: &Path) -> BuildResult<Self> {
        let data = fs::read(path).map_err(|e| BuildError::io(path, e))?;
        Ok(Self::from_bytes(path, &data))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    pub generator_version: String,
    pub created_at: DateTime<Utc>,
    pub languages: Vec<String>,
    pub artifacts: Vec<Artifact>,
}

impl BuildManifest {
    /// Artifact paths are stored relative to `output_dir` when inside it.
    pub fn new(languages: &[String], artifacts: &[Artifact], output_dir: &Path) -> Self {
        let artifacts = artifacts
            .iter()
            .map(|a| Artifact {
                path: a.path.strip_prefix(output_dir).unwrap_or(&a.path).to_path_buf(),
                ..a.clone()
            })
            .collect();
        Self {
            generator_version: GENERATOR_VERSION.to_string(),
            created_at: Utc::now(),
            languages: languages.to_vec(),
            artifacts,
        }
    }

    pub fn to_json(&self) -> BuildResult<String> {
        Ok(canonical_pretty(self)?)
    }

    pub fn find(&self, path: &Path) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.path == path)
    }
}
