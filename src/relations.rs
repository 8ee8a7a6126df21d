//! Relation Indexer - origins/effects per card
//!
//! For an edge `a -> b` of class `c`, `b` is appended to `a.effects[c]` and
//! `a` to `b.origins[c]`. Lists keep edge declaration order.

use std::collections::HashMap;

use crate::model::{Graph, NodeId, RelationIndex};

/// Build the index for every node id, without touching the graph.
pub fn build_index(graph: &Graph) -> HashMap<NodeId, RelationIndex> {
    let mut index: HashMap<NodeId, RelationIndex> = graph
        .nodes
        .iter()
        .map(|n| (n.id, RelationIndex::empty()))
        .collect();

    for (class, edges) in &graph.edges {
        for edge in edges {
            index
                .entry(edge.from)
                .or_insert_with(RelationIndex::empty)
                .effects
                .entry(*class)
                .or_default()
                .push(edge.to);
            index
                .entry(edge.to)
                .or_insert_with(RelationIndex::empty)
                .origins
                .entry(*class)
                .or_default()
                .push(edge.from);
        }
    }

    index
}

/// Attach the computed index to every node. Earlier indices are replaced.
pub fn index_relations(graph: &mut Graph) {
    let mut index = build_index(graph);
    for node in &mut graph.nodes {
        node.relations = index.remove(&node.id).unwrap_or_else(RelationIndex::empty);
    }
    tracing::info!(nodes = graph.nodes.len(), "indexed relations");
}
