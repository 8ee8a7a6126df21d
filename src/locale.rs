//! Localization Filler - per-language text onto graph entities
//!
//! This is the only module that reads per-language storage. A language is
//! filled all-or-nothing: every resource is read before any is attached.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, BuildResult};
use crate::model::{Graph, NodeId};
use crate::normalize::Normalizer;

/// UI label dictionary of one language.
pub type Labels = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Info,
    MoreInfo,
}

impl TextField {
    pub fn resource_stem(&self) -> &'static str {
        match self {
            TextField::Info => "node_info",
            TextField::MoreInfo => "node_moreInfo",
        }
    }
}

/// Where per-language resources come from.
pub trait LocaleSource {
    /// Title table, `id -> title`.
    fn titles(&self, language: &str) -> BuildResult<BTreeMap<NodeId, String>>;

    /// Required long-form text of one card.
    fn node_text(&self, language: &str, field: TextField, id: NodeId) -> BuildResult<String>;

    /// Optional annotation of the `from -> to` relation. `Ok(None)` when absent.
    fn edge_text(&self, language: &str, from: NodeId, to: NodeId) -> BuildResult<Option<String>>;

    /// UI label dictionary.
    fn labels(&self, language: &str) -> BuildResult<Labels>;
}

/// Resources laid out as `<root>/<lang>/node_names.json`,
/// `node_info_<id>.html`, `node_moreInfo_<id>.html`,
/// `edge_info_<from>_<to>.html` and `component_names.json`.
#[derive(Debug, Clone)]
pub struct FsLocaleSource {
    root: PathBuf,
}

impl FsLocaleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, language: &str, file: &str) -> PathBuf {
        self.root.join(language).join(file)
    }

    fn read_required(&self, language: &str, file: &str) -> BuildResult<String> {
        let path = self.path(language, file);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BuildError::missing(language, file),
            _ => BuildError::io(&path, e),
        })
    }
}

impl LocaleSource for FsLocaleSource {
    fn titles(&self, language: &str) -> BuildResult<BTreeMap<NodeId, String>> {
        let file = "node_names.json";
        let content = self.read_required(language, file)?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            BuildError::missing(language, format!("{} is not a title table: {}", file, e))
        })?;

        raw.into_iter()
            .map(|(key, title)| {
                key.trim().parse().map(|id| (NodeId(id), title)).map_err(|_| {
                    BuildError::missing(language, format!("{} has non-numeric key '{}'", file, key))
                })
            })
            .collect()
    }

    fn node_text(&self, language: &str, field: TextField, id: NodeId) -> BuildResult<String> {
        self.read_required(language, &format!("{}_{}.html", field.resource_stem(), id))
    }

    fn edge_text(&self, language: &str, from: NodeId, to: NodeId) -> BuildResult<Option<String>> {
        let path = self.path(language, &format!("edge_info_{}_{}.html", from, to));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BuildError::io(&path, e)),
        }
    }

    fn labels(&self, language: &str) -> BuildResult<Labels> {
        let file = "component_names.json";
        let content = self.read_required(language, file)?;
        serde_json::from_str(&content).map_err(|e| {
            BuildError::missing(language, format!("{} is not a JSON object: {}", file, e))
        })
    }
}

struct NodeText {
    title: String,
    info: String,
    more_info: String,
}

/// Fill `language` onto every node and edge, returning its label dictionary.
///
/// Card info/more_info pass through `normalizer`; edge annotations are kept
/// as read.
pub fn fill_language(
    graph: &mut Graph,
    source: &dyn LocaleSource,
    normalizer: &dyn Normalizer,
    language: &str,
) -> BuildResult<Labels> {
    let mut titles = source.titles(language)?;

    let node_texts = graph
        .nodes
        .iter()
        .map(|node| {
            let title = titles
                .remove(&node.id)
                .ok_or_else(|| BuildError::missing(language, format!("title of node {}", node.id)))?;
            Ok::<_, BuildError>(NodeText {
                title,
                info: normalizer.normalize(&source.node_text(language, TextField::Info, node.id)?),
                more_info: normalizer
                    .normalize(&source.node_text(language, TextField::MoreInfo, node.id)?),
            })
        })
        .collect::<BuildResult<Vec<_>>>()?;

    let edge_texts = graph
        .edges_by_class()
        .map(|edge| {
            let text = source.edge_text(language, edge.from, edge.to)?;
            if text.is_none() {
                tracing::debug!(language, edge = %edge.key(), "no annotation");
            }
            Ok::<_, BuildError>(text)
        })
        .collect::<BuildResult<Vec<_>>>()?;

    let labels = source.labels(language)?;

    for (node, text) in graph.nodes.iter_mut().zip(node_texts) {
        node.title.insert(language, text.title);
        node.info.insert(language, text.info);
        node.more_info.insert(language, text.more_info);
    }

    let mut annotated = 0usize;
    for (edge, text) in graph.edges.values_mut().flatten().zip(edge_texts) {
        if let Some(text) = text {
            edge.info.insert(language, text);
            annotated += 1;
        }
    }

    tracing::info!(
        language,
        nodes = graph.nodes.len(),
        annotated_edges = annotated,
        "localized graph"
    );
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node, RelationClass};
    use crate::normalize::{HtmlMinifier, Passthrough};

    fn graph() -> Graph {
        let mut g = Graph::default();
        g.nodes = vec![
            Node::new(NodeId(1), 1, 0.0, 0.0),
            Node::new(NodeId(2), 1, 1.0, 0.0),
        ];
        g.edges.insert(
            RelationClass::Major,
            vec![
                Edge::new(NodeId(1), NodeId(2), RelationClass::Major),
                Edge::new(NodeId(2), NodeId(1), RelationClass::Major),
            ],
        );
        g
    }

    fn write(root: &Path, language: &str, file: &str, content: &str) {
        let dir = root.join(language);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    fn seed(root: &Path) {
        write(root, "fr", "node_names.json", r#"{"1": "Charbon", "2": "CO2"}"#);
        for id in [1, 2] {
            write(root, "fr", &format!("node_info_{id}.html"), "<p>\n  info\n</p>\n");
            write(root, "fr", &format!("node_moreInfo_{id}.html"), "<p>more</p>");
        }
        write(root, "fr", "edge_info_1_2.html", "<p>car</p>\n");
        write(root, "fr", "component_names.json", r#"{"header": {"title": "Fresque"}}"#);
    }

    #[test]
    fn fills_nodes_and_annotated_edges() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let mut g = graph();

        let labels = fill_language(&mut g, &FsLocaleSource::new(dir.path()), &HtmlMinifier, "fr").unwrap();

        assert_eq!(labels["header"]["title"], "Fresque");
        assert_eq!(g.nodes[0].title.get("fr"), Some("Charbon"));
        assert_eq!(g.nodes[0].info.get("fr"), Some("<p> info </p>"));
        assert!(g.nodes[1].is_localized("fr"));

        let edges = &g.edges[&RelationClass::Major];
        assert_eq!(edges[0].info.get("fr"), Some("<p>car</p>\n"));
        assert_eq!(edges[1].info.get("fr"), None);
    }

    #[test]
    fn missing_title_fails_without_touching_graph() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        write(dir.path(), "fr", "node_names.json", r#"{"1": "Charbon"}"#);
        let mut g = graph();

        let err = fill_language(&mut g, &FsLocaleSource::new(dir.path()), &Passthrough, "fr").unwrap_err();

        assert!(matches!(err, BuildError::MissingLocalization { .. }));
        assert!(err.to_string().contains("title of node 2"));
        assert!(!g.nodes[0].title.contains("fr"));
    }

    #[test]
    fn missing_node_text_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        fs::remove_file(dir.path().join("fr").join("node_moreInfo_2.html")).unwrap();
        let mut g = graph();

        let err = fill_language(&mut g, &FsLocaleSource::new(dir.path()), &Passthrough, "fr").unwrap_err();
        assert!(err.to_string().contains("node_moreInfo_2.html"));
    }

    #[test]
    fn missing_language_dir_is_missing_localization() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = graph();
        let err = fill_language(&mut g, &FsLocaleSource::new(dir.path()), &Passthrough, "de").unwrap_err();
        assert!(matches!(err, BuildError::MissingLocalization { ref language, .. } if language == "de"));
    }

    #[test]
    fn absent_edge_text_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsLocaleSource::new(dir.path());
        assert_eq!(source.edge_text("fr", NodeId(1), NodeId(2)).unwrap(), None);
    }
}
