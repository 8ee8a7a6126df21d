//! Build Pipeline - Single Entry Point
//!
//! load -> index -> localize (every language) -> viewer payload ->
//! translation bundle -> per language: render documents, convert.
//! The first error stops the run; nothing after it is written.

use std::collections::BTreeMap;

use crate::config::BuildConfig;
use crate::convert::{DocumentConverter, PdfConverter};
use crate::error::{BuildError, BuildResult};
use crate::export;
use crate::loader::load_graph;
use crate::locale::{fill_language, FsLocaleSource, Labels, LocaleSource};
use crate::manifest::{Artifact, BuildManifest};
use crate::model::Graph;
use crate::normalize::{HtmlMinifier, Normalizer};
use crate::relations::index_relations;
use crate::render::{HandlebarsRenderer, TemplateRenderer};

/// Graph with every configured language filled in.
#[derive(Debug, Clone)]
pub struct LocalizedGraph {
    pub graph: Graph,
    pub labels: BTreeMap<String, Labels>,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub artifacts: Vec<Artifact>,
    pub manifest: Option<BuildManifest>,
}

pub struct BuildPipeline {
    config: BuildConfig,
    locale: Box<dyn LocaleSource>,
    normalizer: Box<dyn Normalizer>,
    renderer: Option<Box<dyn TemplateRenderer>>,
    converter: Option<Box<dyn DocumentConverter>>,
}

impl BuildPipeline {
    /// Collaborators from the configuration: resources under `data_dir`,
    /// the configured converter. Handlebars templates are read from
    /// `templates_dir` when `run` starts, so `prepare` works without them.
    pub fn new(config: BuildConfig) -> BuildResult<Self> {
        config.validate()?;
        let converter = config
            .converter
            .map(|kind| Box::new(PdfConverter::new(kind, config.margins)) as Box<dyn DocumentConverter>);
        Ok(Self {
            locale: Box::new(FsLocaleSource::new(&config.data_dir)),
            normalizer: Box::new(HtmlMinifier),
            renderer: None,
            converter,
            config,
        })
    }

    /// Explicit collaborators, for embedding and tests.
    pub fn with_collaborators(
        config: BuildConfig,
        locale: Box<dyn LocaleSource>,
        renderer: Box<dyn TemplateRenderer>,
        converter: Option<Box<dyn DocumentConverter>>,
    ) -> BuildResult<Self> {
        config.validate()?;
        if let Some(converter) = &converter {
            if !config.formats.contains(&converter.source_format()) {
                return Err(BuildError::Config(format!(
                    "converter reads {} documents, which are not in formats",
                    converter.source_format().extension()
                )));
            }
        }
        Ok(Self {
            config,
            locale,
            normalizer: Box::new(HtmlMinifier),
            renderer: Some(renderer),
            converter,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Load, index and localize. Writes nothing.
    pub fn prepare(&self) -> BuildResult<LocalizedGraph> {
        let mut graph = load_graph(&self.config.graph_path())?;
        index_relations(&mut graph);

        let mut labels = BTreeMap::new();
        for language in &self.config.languages {
            let dictionary = fill_language(&mut graph, self.locale.as_ref(), self.normalizer.as_ref(), language)?;
            labels.insert(language.clone(), dictionary);
        }

        Ok(LocalizedGraph { graph, labels })
    }

    /// Run every stage and write all artifacts.
    pub fn run(&self) -> BuildResult<BuildReport> {
        let loaded;
        let renderer: &dyn TemplateRenderer = match &self.renderer {
            Some(renderer) => renderer.as_ref(),
            None => {
                loaded = HandlebarsRenderer::load_from_dir(&self.config.templates_dir)?;
                &loaded
            }
        };

        let localized = self.prepare()?;
        let graph = &localized.graph;
        let mut artifacts = vec![];

        let payload = export::visualization_payload(graph)?;
        artifacts.push(export::write_json(&self.config.graph_output(), &payload)?);

        let bundle = export::translation_bundle(graph, &localized.labels, &self.config.languages)?;
        artifacts.push(export::write_json(&self.config.translations_output(), &bundle)?);

        for language in &self.config.languages {
            artifacts.extend(self.build_documents(graph, renderer, language)?);
        }

        let manifest = if self.config.write_manifest {
            let manifest = BuildManifest::new(&self.config.languages, &artifacts, &self.config.output_dir);
            export::write_artifact(&self.config.manifest_output(), manifest.to_json()?.as_bytes())?;
            Some(manifest)
        } else {
            None
        };

        tracing::info!(artifacts = artifacts.len(), "build complete");
        Ok(BuildReport { artifacts, manifest })
    }

    fn build_documents(
        &self,
        graph: &Graph,
        renderer: &dyn TemplateRenderer,
        language: &str,
    ) -> BuildResult<Vec<Artifact>> {
        let basename = &self.config.document_basename;
        let docs_dir = self.config.documents_dir();
        let normalizer = self
            .config
            .minify_documents
            .then_some(self.normalizer.as_ref());
        let mut artifacts = vec![];

        for format in &self.config.formats {
            let text = export::render_document(graph, renderer, normalizer, basename, language, *format)?;
            let path = docs_dir.join(format.file_name(basename, language));
            artifacts.push(export::write_artifact(&path, text.as_bytes())?);
        }

        if let Some(converter) = &self.converter {
            let source = docs_dir.join(converter.source_format().file_name(basename, language));
            let output = converter.convert(&source)?;
            artifacts.push(Artifact::from_file(&output)?);
        }

        Ok(artifacts)
    }
}
