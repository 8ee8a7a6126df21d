//! Graph Loader - base graph definition to typed entities
//!
//! Nothing is returned unless the whole file parses and validates.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{BuildError, BuildResult};
use crate::model::{numeric, Edge, Graph, Node, NodeId, RelationClass};
use crate::validation::GraphValidator;

#[derive(Debug, Deserialize)]
struct GraphDefinition {
    nodes: Vec<NodeDefinition>,
    edges: BTreeMap<RelationClass, Vec<EdgeDefinition>>,
}

#[derive(Debug, Deserialize)]
struct NodeDefinition {
    id: NodeId,
    #[serde(deserialize_with = "numeric")]
    batch: u64,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeDefinition {
    from: NodeId,
    to: NodeId,
}

/// Read and parse `path`.
pub fn load_graph(path: &Path) -> BuildResult<Graph> {
    let content = fs::read_to_string(path)
        .map_err(|e| BuildError::load(path, format!("cannot read file: {}", e)))?;
    parse_graph(&content, path)
}

/// Parse a graph definition; `origin` is only used in error messages.
pub fn parse_graph(content: &str, origin: &Path) -> BuildResult<Graph> {
    let definition: GraphDefinition = serde_json::from_str(content)
        .map_err(|e| BuildError::load(origin, format!("invalid graph definition: {}", e)))?;

    let nodes = definition
        .nodes
        .into_iter()
        .map(|n| Node::new(n.id, n.batch, n.x, n.y))
        .collect();

    let edges = definition
        .edges
        .into_iter()
        .map(|(class, pairs)| {
            let edges = pairs
                .into_iter()
                .map(|p| Edge::new(p.from, p.to, class))
                .collect();
            (class, edges)
        })
        .collect();

    let graph = Graph { nodes, edges };

    let report = GraphValidator::new().validate(&graph);
    for warning in report.warnings() {
        tracing::warn!(rule = %warning.rule, "{}", warning.message);
    }
    if report.has_errors() {
        return Err(BuildError::load(origin, report.summary()));
    }

    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edge_count(),
        "loaded graph from {}",
        origin.display()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> BuildResult<Graph> {
        parse_graph(content, &PathBuf::from("graph_base.json"))
    }

    #[test]
    fn parses_nodes_and_grouped_edges() {
        let graph = parse(
            r#"{
                "nodes": [
                    {"id": 1, "batch": 1, "x": 0, "y": 1.5},
                    {"id": "2", "batch": "2", "x": 3, "y": -1}
                ],
                "edges": {
                    "major": [{"from": 1, "to": 2}],
                    "simplified": [{"from": "2", "to": "1"}]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].batch, 2);
        assert_eq!(graph.nodes[0].y, 1.5);
        assert_eq!(graph.edges[&RelationClass::Major][0].to, NodeId(2));
        assert_eq!(graph.edges[&RelationClass::Simplified][0].relation, RelationClass::Simplified);
    }

    #[test]
    fn missing_field_is_load_error() {
        let err = parse(r#"{"nodes": [{"id": 1, "batch": 1, "x": 0}], "edges": {}}"#).unwrap_err();
        assert!(matches!(err, BuildError::Load { .. }));
        assert!(err.to_string().contains("y"));
    }

    #[test]
    fn unknown_relation_class_is_load_error() {
        let err = parse(
            r#"{"nodes": [{"id": 1, "batch": 1, "x": 0, "y": 0}],
                "edges": {"strong": [{"from": 1, "to": 1}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Load { .. }));
    }

    #[test]
    fn dangling_edge_is_load_error() {
        let err = parse(
            r#"{"nodes": [{"id": 1, "batch": 1, "x": 0, "y": 0}],
                "edges": {"minor": [{"from": 1, "to": 7}]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("edge_endpoints"));
    }

    #[test]
    fn not_json_is_load_error() {
        assert!(matches!(parse("nodes: []"), Err(BuildError::Load { .. })));
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = load_graph(Path::new("/nonexistent/graph_base.json")).unwrap_err();
        assert!(matches!(err, BuildError::Load { .. }));
    }
}
