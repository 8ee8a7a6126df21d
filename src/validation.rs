//! Graph Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! The loader rejects the graph on any error; warnings are only logged.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::model::Graph;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<GraphViolation>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &GraphViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &GraphViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Warning)
    }

    /// Error messages joined for a single load failure.
    pub fn summary(&self) -> String {
        self.errors()
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Graph rule trait - produces violations
pub trait GraphRule {
    fn name(&self) -> &'static str;
    fn check(&self, graph: &Graph) -> Vec<GraphViolation>;
}

fn violation(rule: &dyn GraphRule, severity: ViolationSeverity, message: String) -> GraphViolation {
    GraphViolation {
        rule: rule.name().to_string(),
        severity,
        message,
    }
}

// --- Concrete Rules ---

pub struct UniqueNodeIds;

impl GraphRule for UniqueNodeIds {
    fn name(&self) -> &'static str { "unique_node_ids" }

    fn check(&self, graph: &Graph) -> Vec<GraphViolation> {
        let mut seen = HashSet::new();
        let mut reported = BTreeSet::new();
        for node in &graph.nodes {
            if !seen.insert(node.id) {
                reported.insert(node.id);
            }
        }
        reported
            .into_iter()
            .map(|id| violation(self, ViolationSeverity::Error, format!("node id {} is declared more than once", id)))
            .collect()
    }
}

pub struct EdgeEndpoints;

impl GraphRule for EdgeEndpoints {
    fn name(&self) -> &'static str { "edge_endpoints" }

    fn check(&self, graph: &Graph) -> Vec<GraphViolation> {
        let known: HashSet<_> = graph.nodes.iter().map(|n| n.id).collect();
        let mut violations = vec![];

        for edge in graph.edges_by_class() {
            for (end, id) in [("from", edge.from), ("to", edge.to)] {
                if !known.contains(&id) {
                    violations.push(violation(
                        self,
                        ViolationSeverity::Error,
                        format!("{} edge {} references unknown '{}' node {}", edge.relation, edge.key(), end, id),
                    ));
                }
            }
        }

        violations
    }
}

pub struct SelfLoop;

impl GraphRule for SelfLoop {
    fn name(&self) -> &'static str { "self_loop" }

    fn check(&self, graph: &Graph) -> Vec<GraphViolation> {
        graph
            .edges_by_class()
            .filter(|e| e.from == e.to)
            .map(|e| violation(self, ViolationSeverity::Warning, format!("{} edge {} points to itself", e.relation, e.key())))
            .collect()
    }
}

pub struct DuplicateEdge;

impl GraphRule for DuplicateEdge {
    fn name(&self) -> &'static str { "duplicate_edge" }

    fn check(&self, graph: &Graph) -> Vec<GraphViolation> {
        let mut violations = vec![];
        for (class, edges) in &graph.edges {
            let mut seen = HashSet::new();
            for edge in edges {
                if !seen.insert(edge.sort_key()) {
                    violations.push(violation(
                        self,
                        ViolationSeverity::Warning,
                        format!("{} edge {} is declared more than once", class, edge.key()),
                    ));
                }
            }
        }
        violations
    }
}

/// Validator runs every rule over the graph
pub struct GraphValidator {
    rules: Vec<Box<dyn GraphRule>>,
}

impl GraphValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(UniqueNodeIds),
                Box::new(EdgeEndpoints),
                Box::new(SelfLoop),
                Box::new(DuplicateEdge),
            ],
        }
    }

    pub fn validate(&self, graph: &Graph) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.violations.extend(rule.check(graph));
        }
        report
    }
}

impl Default for GraphValidator {
    fn default() -> Self {
        Self::new()
    }
}
