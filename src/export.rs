//! Artifact serialization: viewer payload, translation bundle, documents.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::canonical::canonical_pretty;
use crate::error::{BuildError, BuildResult};
use crate::locale::Labels;
use crate::manifest::Artifact;
use crate::model::{Graph, RelationClass};
use crate::normalize::Normalizer;
use crate::render::{DocumentFormat, TemplateRenderer};
use crate::views;

/// `{edges: [...], nodes: {id: {...}}}` for the graph viewer. Edges are
/// listed class by class in declaration order.
pub fn visualization_payload(graph: &Graph) -> BuildResult<Value> {
    let edges: Vec<_> = graph.edges_by_class().map(views::vis_edge).collect();
    let mut nodes = Map::new();
    for node in &graph.nodes {
        nodes.insert(node.id.to_string(), serde_json::to_value(views::vis_node(node))?);
    }
    Ok(json!({ "edges": edges, "nodes": nodes }))
}

/// One entry per language: the label dictionary plus `nodes` and the
/// annotated `edges` keyed by `"<from>_<to>"`.
pub fn translation_bundle(
    graph: &Graph,
    labels: &BTreeMap<String, Labels>,
    languages: &[String],
) -> BuildResult<Value> {
    let flattened = graph.flattened_edges();
    let mut bundle = Map::new();

    for language in languages {
        let mut entry = labels
            .get(language)
            .cloned()
            .ok_or_else(|| BuildError::missing(language, "component_names.json"))?;

        let mut nodes = Map::new();
        for node in &graph.nodes {
            nodes.insert(
                node.id.to_string(),
                serde_json::to_value(views::translation_node(node, language)?)?,
            );
        }

        let mut edges = Map::new();
        for edge in &flattened {
            if let Some(view) = views::translation_edge(edge, language) {
                edges.insert(edge.key(), serde_json::to_value(view)?);
            }
        }

        entry.insert("nodes".to_string(), Value::Object(nodes));
        entry.insert("edges".to_string(), Value::Object(edges));
        bundle.insert(language.clone(), Value::Object(entry));
    }

    Ok(Value::Object(bundle))
}

/// Template bindings: `cards`, `relations` sorted by `(from, to)`,
/// `language` and the class -> severity `color_mapping`.
pub fn document_bindings(graph: &Graph, language: &str, format: DocumentFormat) -> BuildResult<Value> {
    let cards = graph
        .nodes
        .iter()
        .map(|n| views::document_node(n, language, format))
        .collect::<BuildResult<Vec<_>>>()?;
    let relations: Vec<_> = graph
        .flattened_edges()
        .into_iter()
        .map(|e| views::document_edge(e, language, format))
        .collect();

    Ok(json!({
        "cards": cards,
        "relations": relations,
        "language": language,
        "color_mapping": RelationClass::color_mapping(),
    }))
}

/// Render one document through the template collaborator. HTML output
/// goes through `normalizer` when one is given.
pub fn render_document(
    graph: &Graph,
    renderer: &dyn TemplateRenderer,
    normalizer: Option<&dyn Normalizer>,
    basename: &str,
    language: &str,
    format: DocumentFormat,
) -> BuildResult<String> {
    let bindings = document_bindings(graph, language, format)?;
    let text = renderer.render(&format.template_name(basename), &bindings)?;
    Ok(match (format, normalizer) {
        (DocumentFormat::Html, Some(normalizer)) => normalizer.normalize(&text),
        _ => text,
    })
}

pub fn write_artifact(path: &Path, data: &[u8]) -> BuildResult<Artifact> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::write(path, data).map_err(|e| BuildError::io(path, e))?;
    tracing::info!(bytes = data.len(), "wrote {}", path.display());
    Ok(Artifact::from_bytes(path, data))
}

pub fn write_json(path: &Path, value: &Value) -> BuildResult<Artifact> {
    write_artifact(path, canonical_pretty(value)?.as_bytes())
}
