//! Build configuration, passed explicitly into the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{ConverterKind, PageMargins};
use crate::error::{BuildError, BuildResult};
use crate::render::DocumentFormat;

pub const GRAPH_FILE: &str = "graph_base.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// `graph_base.json` and one resource directory per language.
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub languages: Vec<String>,
    pub document_basename: String,
    pub formats: Vec<DocumentFormat>,
    /// `None` renders documents without producing PDFs.
    pub converter: Option<ConverterKind>,
    pub margins: PageMargins,
    pub minify_documents: bool,
    pub write_manifest: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("website/public/data"),
            templates_dir: PathBuf::from("templates"),
            languages: ["fr", "en", "de", "es"].iter().map(|l| l.to_string()).collect(),
            document_basename: "documentation".to_string(),
            formats: vec![DocumentFormat::Tex, DocumentFormat::Html],
            converter: Some(ConverterKind::Xelatex),
            margins: PageMargins::default(),
            minify_documents: false,
            write_manifest: true,
        }
    }
}

impl BuildConfig {
    pub fn load(path: &Path) -> BuildResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| BuildError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> BuildResult<()> {
        if self.languages.is_empty() {
            return Err(BuildError::Config("at least one language is required".into()));
        }
        let mut seen = HashSet::new();
        for language in &self.languages {
            if language.is_empty() || language.contains(['/', '\\', '.']) {
                return Err(BuildError::Config(format!("invalid language code '{}'", language)));
            }
            if !seen.insert(language) {
                return Err(BuildError::Config(format!("language '{}' listed twice", language)));
            }
        }
        if self.document_basename.is_empty() {
            return Err(BuildError::Config("document basename is empty".into()));
        }
        if let Some(kind) = self.converter {
            if !self.formats.contains(&kind.source_format()) {
                return Err(BuildError::Config(format!(
                    "{} converts {} documents, which are not in formats",
                    kind.program(),
                    kind.source_format().extension()
                )));
            }
        }
        Ok(())
    }

    pub fn graph_path(&self) -> PathBuf {
        self.data_dir.join(GRAPH_FILE)
    }

    pub fn graph_output(&self) -> PathBuf {
        self.output_dir.join("content").join("graph.json")
    }

    pub fn translations_output(&self) -> PathBuf {
        self.output_dir.join("content").join("translations.json")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.output_dir.join("dl")
    }

    pub fn manifest_output(&self) -> PathBuf {
        self.output_dir.join("manifest.json")
    }
}
