//! Core data structures for experiment knowledge graphs.
//!
//! A knowledge graph is an ordered list of labeled nodes and an ordered list of
//! directed, labeled edges. Node identity is carried solely by the integer `id`
//! field, so renaming a node's id re-targets every edge that references it.

use crate::error::{PermuteError, PermuteResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a node within one knowledge graph.
///
/// # Invariant
/// - `NodeId`s are unique within a given `KnowledgeGraph`.
/// - Equality and hash are based solely on the inner `i64`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    /// Creates a new `NodeId` from a raw integer.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation.
    #[inline]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Hash for NodeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A labeled node. Labels carry the semantic content and need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Semantic label (e.g. an entity or measurement name).
    pub label: String,
}

impl Node {
    /// Creates a node.
    #[inline]
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A directed, labeled edge.
///
/// Parallel edges between the same pair of nodes are distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Id of the source node.
    pub source: NodeId,
    /// Id of the target node.
    pub target: NodeId,
    /// Relation name.
    pub relation: String,
}

impl Edge {
    /// Creates an edge.
    #[inline]
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
        }
    }
}

/// Knowledge graph extracted from one experiment's results.
///
/// # Invariants
/// - Node ids are unique.
/// - Every edge's `source` and `target` reference an existing node id.
///
/// Deserialized graphs are not validated until [`KnowledgeGraph::validate`]
/// runs; the engine does so before enumerating.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl KnowledgeGraph {
    /// Creates an empty graph.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from nodes and edges, validating the invariants.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> PermuteResult<Self> {
        let graph = Self { nodes, edges };
        graph.validate()?;
        Ok(graph)
    }

    /// Appends a node; fails if the id is already taken.
    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        label: impl Into<String>,
    ) -> PermuteResult<NodeId> {
        let node = Node::new(id, label);
        if self.contains_node(node.id) {
            return Err(PermuteError::InvalidGraph(format!(
                "duplicate node id {}",
                node.id
            )));
        }
        let id = node.id;
        self.nodes.push(node);
        Ok(id)
    }

    /// Appends an edge; both endpoints must already exist.
    pub fn add_edge(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relation: impl Into<String>,
    ) -> PermuteResult<()> {
        let edge = Edge::new(source, target, relation);
        for endpoint in [edge.source, edge.target] {
            if !self.contains_node(endpoint) {
                return Err(PermuteError::dangling_endpoint(self.edges.len(), endpoint));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Nodes in insertion order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Looks up a node by id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Checks whether a node with the given id exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Builds the id→label lookup for the graph's current ids.
    pub fn label_index(&self) -> LabelIndex<'_> {
        LabelIndex::new(self)
    }

    /// Checks node-id uniqueness and that every edge endpoint exists.
    pub fn validate(&self) -> PermuteResult<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(PermuteError::InvalidGraph(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
        }
        for (index, edge) in self.edges.iter().enumerate() {
            for endpoint in [edge.source, edge.target] {
                if !seen.contains(&endpoint) {
                    return Err(PermuteError::dangling_endpoint(index, endpoint));
                }
            }
        }
        Ok(())
    }

    /// Mutable node access for id rewriting. Edges are never exposed mutably.
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }
}

/// Precomputed id→label lookup, built once per graph.
#[derive(Debug, Clone)]
pub struct LabelIndex<'g> {
    labels: HashMap<NodeId, &'g str>,
}

impl<'g> LabelIndex<'g> {
    /// Indexes every node of `graph`.
    pub fn new(graph: &'g KnowledgeGraph) -> Self {
        let labels = graph
            .nodes()
            .iter()
            .map(|node| (node.id, node.label.as_str()))
            .collect();
        Self { labels }
    }

    /// Label of the node with the given id.
    #[inline]
    pub fn label(&self, id: NodeId) -> Option<&'g str> {
        self.labels.get(&id).copied()
    }

    /// Label of the node with the given id, or an `InvalidGraph` error.
    pub fn require(&self, id: NodeId) -> PermuteResult<&'g str> {
        self.label(id)
            .ok_or_else(|| PermuteError::InvalidGraph(format!("no node with id {id}")))
    }

    /// Number of indexed nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true when the graph had no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> KnowledgeGraph {
        KnowledgeGraph::from_parts(
            vec![Node::new(1, "A"), Node::new(2, "B"), Node::new(3, "C")],
            vec![Edge::new(1, 2, "causes"), Edge::new(2, 3, "causes")],
        )
        .unwrap()
    }

    #[test]
    fn builds_and_counts() {
        let graph = chain();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.get_node(NodeId::new(2)).unwrap().label, "B");
        assert!(!graph.contains_node(NodeId::new(4)));
    }

    #[test]
    fn rejects_dangling_edge() {
        let err = KnowledgeGraph::from_parts(
            vec![Node::new(1, "A")],
            vec![Edge::new(1, 9, "causes")],
        )
        .unwrap_err();
        assert!(matches!(err, PermuteError::InvalidGraph(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(1, "A").unwrap();
        assert!(graph.add_node(1, "A again").is_err());

        let err = KnowledgeGraph::from_parts(vec![Node::new(5, "x"), Node::new(5, "y")], vec![])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn add_edge_checks_endpoints() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(1, "A").unwrap();
        graph.add_node(2, "B").unwrap();
        assert!(graph.add_edge(1, 2, "r").is_ok());
        assert!(graph.add_edge(2, 3, "r").is_err());
        // Parallel edges are distinct entities.
        assert!(graph.add_edge(1, 2, "r").is_ok());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn label_index_resolves_ids() {
        let graph = chain();
        let index = graph.label_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.label(NodeId::new(3)), Some("C"));
        assert!(index.require(NodeId::new(42)).is_err());
    }

    #[test]
    fn json_shape_matches_extraction_output() {
        let json = r#"{
            "nodes": [{"id": 1, "label": "A"}, {"id": 2, "label": "B"}],
            "edges": [{"source": 1, "target": 2, "relation": "causes"}]
        }"#;
        let graph: KnowledgeGraph = serde_json::from_str(json).unwrap();
        assert!(graph.validate().is_ok());
        assert_eq!(graph.edges()[0], Edge::new(1, 2, "causes"));
    }
}
