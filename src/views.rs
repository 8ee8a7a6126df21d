//! Render Views - per-format records for one entity
//!
//! Each output reads the same immutable graph through its own view:
//! the viewer payload, the translation bundle and the document templates.

use serde::{Serialize, Serializer};

use crate::error::{BuildError, BuildResult};
use crate::model::{Edge, Localized, Node, NodeId, RelationClass, RelationIndex};
use crate::normalize::HtmlToLatex;
use crate::render::DocumentFormat;
use crate::wrap::wrap_title;

/// Grid units to viewer pixels.
pub const LAYOUT_SCALE: f64 = 115.0;

fn coord<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn localized<'a>(field: &'a Localized, language: &str, what: &str, id: NodeId) -> BuildResult<&'a str> {
    field
        .get(language)
        .ok_or_else(|| BuildError::missing(language, format!("{} of node {}", what, id)))
}

#[derive(Debug, Clone, Serialize)]
pub struct VisNode<'a> {
    pub id: NodeId,
    pub batch: u64,
    pub relations: &'a RelationIndex,
    #[serde(serialize_with = "coord")]
    pub x: f64,
    #[serde(serialize_with = "coord")]
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisEdge {
    pub id: String,
    pub from: NodeId,
    pub to: NodeId,
    pub relation: RelationClass,
}

pub fn vis_node(node: &Node) -> VisNode<'_> {
    VisNode {
        id: node.id,
        batch: node.batch,
        relations: &node.relations,
        x: node.x * LAYOUT_SCALE,
        y: node.y * LAYOUT_SCALE,
    }
}

pub fn vis_edge(edge: &Edge) -> VisEdge {
    VisEdge {
        id: edge.key(),
        from: edge.from,
        to: edge.to,
        relation: edge.relation,
    }
}

/// Node entry of the translation bundle. Keys are camelCase for the viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationNode<'a> {
    pub id: NodeId,
    pub batch: u64,
    pub relations: &'a RelationIndex,
    pub title: &'a str,
    pub info: &'a str,
    pub wrapped_title: String,
    pub more_info: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationEdge<'a> {
    pub info: &'a str,
}

pub fn translation_node<'a>(node: &'a Node, language: &str) -> BuildResult<TranslationNode<'a>> {
    let title = localized(&node.title, language, "title", node.id)?;
    Ok(TranslationNode {
        id: node.id,
        batch: node.batch,
        relations: &node.relations,
        title,
        info: localized(&node.info, language, "info", node.id)?,
        wrapped_title: wrap_title(title),
        more_info: localized(&node.more_info, language, "more_info", node.id)?,
    })
}

/// `None` when the edge has no annotation in `language`.
pub fn translation_edge<'a>(edge: &'a Edge, language: &str) -> Option<TranslationEdge<'a>> {
    edge.info.get(language).map(|info| TranslationEdge { info })
}

/// Card as bound into a document template.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentNode<'a> {
    pub id: NodeId,
    pub batch: u64,
    pub relations: &'a RelationIndex,
    pub title: &'a str,
    pub info: &'a str,
    pub wrapped_title: String,
    pub more_info: String,
}

/// Relation as bound into a document template.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEdge {
    pub id: String,
    pub from: NodeId,
    pub to: NodeId,
    pub relation: RelationClass,
    pub info: Option<String>,
}

fn for_format(html: &str, format: DocumentFormat) -> String {
    match format {
        DocumentFormat::Html => html.to_string(),
        DocumentFormat::Tex => HtmlToLatex.convert(html),
    }
}

pub fn document_node<'a>(
    node: &'a Node,
    language: &str,
    format: DocumentFormat,
) -> BuildResult<DocumentNode<'a>> {
    let title = localized(&node.title, language, "title", node.id)?;
    let more_info = localized(&node.more_info, language, "more_info", node.id)?;
    Ok(DocumentNode {
        id: node.id,
        batch: node.batch,
        relations: &node.relations,
        title,
        info: localized(&node.info, language, "info", node.id)?,
        wrapped_title: wrap_title(title),
        more_info: for_format(more_info, format),
    })
}

pub fn document_edge(edge: &Edge, language: &str, format: DocumentFormat) -> DocumentEdge {
    DocumentEdge {
        id: edge.key(),
        from: edge.from,
        to: edge.to,
        relation: edge.relation,
        info: edge.info.get(language).map(|info| for_format(info, format)),
    }
}
