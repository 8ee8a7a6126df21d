//! Fresque Docgen - Card Deck Build Pipeline
//!
//! Turns the causal card graph and its per-language texts into:
//! 1. the graph viewer payload (`content/graph.json`)
//! 2. the translation bundle (`content/translations.json`)
//! 3. one rendered document and its PDF per language (`dl/`)
//!
//! Entities are built once, filled once per language, then only read.

pub mod canonical;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod loader;
pub mod locale;
pub mod manifest;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod relations;
pub mod render;
pub mod validation;
pub mod views;
pub mod wrap;

pub use config::BuildConfig;
pub use convert::{ConverterKind, DocumentConverter, PageMargins, PdfConverter};
pub use error::{BuildError, BuildResult};
pub use locale::{FsLocaleSource, LocaleSource, TextField};
pub use model::{Edge, Graph, Localized, Node, NodeId, RelationClass, RelationIndex};
pub use normalize::{HtmlMinifier, HtmlToLatex, Normalizer};
pub use pipeline::{BuildPipeline, BuildReport, LocalizedGraph};
pub use render::{DocumentFormat, HandlebarsRenderer, TemplateRenderer};

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
