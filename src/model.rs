//! Graph Entities - Cards and Causal Relations

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Card identifier. Ordering is numeric, so `2 < 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        numeric(deserializer).map(NodeId)
    }
}

/// Accepts `12` as well as `"12"`; the card data has used both.
pub(crate) fn numeric<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("expected a non-negative integer, got '{}'", s))
        }),
    }
}

/// Strength of a causal relation between two cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationClass {
    Major,
    Minor,
    False,
    Simplified,
}

impl RelationClass {
    pub const ALL: [RelationClass; 4] = [
        RelationClass::Major,
        RelationClass::Minor,
        RelationClass::False,
        RelationClass::Simplified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationClass::Major => "major",
            RelationClass::Minor => "minor",
            RelationClass::False => "false",
            RelationClass::Simplified => "simplified",
        }
    }

    /// Color/severity name used by the document templates.
    pub fn severity(&self) -> &'static str {
        match self {
            RelationClass::Major => "success",
            RelationClass::Minor => "warning",
            RelationClass::False => "danger",
            RelationClass::Simplified => "info",
        }
    }

    pub fn color_mapping() -> BTreeMap<&'static str, &'static str> {
        Self::ALL.iter().map(|c| (c.as_str(), c.severity())).collect()
    }
}

impl fmt::Display for RelationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language code -> text. Filled only by the localization stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Localized(BTreeMap<String, String>);

impl Localized {
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    pub fn contains(&self, language: &str) -> bool {
        self.0.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, language: &str, text: String) {
        self.0.insert(language.to_string(), text);
    }
}

/// Per-class neighbor lists, in edge declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationIndex {
    pub origins: BTreeMap<RelationClass, Vec<NodeId>>,
    pub effects: BTreeMap<RelationClass, Vec<NodeId>>,
}

impl RelationIndex {
    /// An index with an empty list for every class.
    pub fn empty() -> Self {
        let lists = || RelationClass::ALL.iter().map(|c| (*c, Vec::new())).collect();
        Self {
            origins: lists(),
            effects: lists(),
        }
    }

    pub fn origins_of(&self, class: RelationClass) -> &[NodeId] {
        self.origins.get(&class).map_or(&[], Vec::as_slice)
    }

    pub fn effects_of(&self, class: RelationClass) -> &[NodeId] {
        self.effects.get(&class).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub batch: u64,
    pub x: f64,
    pub y: f64,
    pub title: Localized,
    pub info: Localized,
    pub more_info: Localized,
    pub relations: RelationIndex,
}

impl Node {
    pub fn new(id: NodeId, batch: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            batch,
            x,
            y,
            title: Localized::default(),
            info: Localized::default(),
            more_info: Localized::default(),
            relations: RelationIndex::empty(),
        }
    }

    /// True once title, info and more_info all hold `language`.
    pub fn is_localized(&self, language: &str) -> bool {
        self.title.contains(language)
            && self.info.contains(language)
            && self.more_info.contains(language)
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub relation: RelationClass,
    pub info: Localized,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, relation: RelationClass) -> Self {
        Self {
            from,
            to,
            relation,
            info: Localized::default(),
        }
    }

    /// `"<from>_<to>"`, shared by the viewer payload and the translation bundle.
    pub fn key(&self) -> String {
        format!("{}_{}", self.from, self.to)
    }

    pub fn sort_key(&self) -> (NodeId, NodeId) {
        (self.from, self.to)
    }
}

/// The built card deck.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: BTreeMap<RelationClass, Vec<Edge>>,
}

impl Graph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges grouped by class, in declaration order within each class.
    pub fn edges_by_class(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Every edge, sorted by `(from, to)`. The sort is stable, so pairs
    /// present in several classes keep class order.
    pub fn flattened_edges(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges_by_class().collect();
        edges.sort_by_key(|e| e.sort_key());
        edges
    }
}
