//! Canonical triple signatures and incremental deduplication.
//!
//! Two graphs are considered the same variant when their sorted
//! `(source label, relation, target label)` sequences are equal. This is an
//! equality test on the triple multiset, not graph isomorphism: the same
//! triples under different node-id assignments compare equal.

use crate::core::KnowledgeGraph;
use crate::error::PermuteResult;
use crate::fingerprint::{signature_fingerprint, HashValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A resolved relation fact derived from one edge.
///
/// Ordering is lexicographic over `(source, relation, target)`. Serialized as
/// a three-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct Triple {
    /// Label of the source node.
    pub source: String,
    /// Edge relation.
    pub relation: String,
    /// Label of the target node.
    pub target: String,
}

impl Triple {
    /// Creates a triple.
    pub fn new(
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relation: relation.into(),
            target: target.into(),
        }
    }
}

impl From<(String, String, String)> for Triple {
    fn from((source, relation, target): (String, String, String)) -> Self {
        Self {
            source,
            relation,
            target,
        }
    }
}

impl From<Triple> for (String, String, String) {
    fn from(triple: Triple) -> Self {
        (triple.source, triple.relation, triple.target)
    }
}

/// Triples of `graph` in edge order, labels resolved by current node ids.
pub fn graph_triples(graph: &KnowledgeGraph) -> PermuteResult<Vec<Triple>> {
    let labels = graph.label_index();
    graph
        .edges()
        .iter()
        .map(|edge| {
            Ok(Triple::new(
                labels.require(edge.source)?,
                edge.relation.as_str(),
                labels.require(edge.target)?,
            ))
        })
        .collect()
}

/// Sorted triple sequence of a graph; the equivalence key for dedup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(Vec<Triple>);

impl Signature {
    /// Computes the signature of `graph`.
    pub fn of(graph: &KnowledgeGraph) -> PermuteResult<Self> {
        Ok(Self::from_triples(graph_triples(graph)?))
    }

    /// Sorts `triples` into a signature.
    pub fn from_triples(mut triples: Vec<Triple>) -> Self {
        triples.sort();
        Self(triples)
    }

    /// The sorted triples.
    #[inline]
    pub fn triples(&self) -> &[Triple] {
        &self.0
    }

    /// Number of triples (one per edge).
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a graph without edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Domain-separated SHA-256 of the signature.
    pub fn fingerprint(&self) -> HashValue {
        signature_fingerprint(self)
    }
}

/// Shorthand for [`Signature::of`].
#[inline]
pub fn signature(graph: &KnowledgeGraph) -> PermuteResult<Signature> {
    Signature::of(graph)
}

/// True iff `candidate`'s signature differs from that of every graph in `accepted`.
pub fn is_unique(candidate: &KnowledgeGraph, accepted: &[KnowledgeGraph]) -> PermuteResult<bool> {
    let candidate = Signature::of(candidate)?;
    for graph in accepted {
        if Signature::of(graph)? == candidate {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Running set of accepted signatures.
///
/// Seeded with the original graph so that any permutation collapsing back to
/// it is rejected. Which candidate wins a signature depends on enumeration
/// order; the final set of signatures does not.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    accepted: HashSet<Signature>,
}

impl SignatureRegistry {
    /// Creates a registry containing the signature of `original`.
    pub fn seeded(original: &KnowledgeGraph) -> PermuteResult<Self> {
        let mut registry = Self::default();
        registry.admit(Signature::of(original)?);
        Ok(registry)
    }

    /// Records `signature` and returns true if it was not yet accepted.
    pub fn admit(&mut self, signature: Signature) -> bool {
        self.accepted.insert(signature)
    }

    /// Returns true if `signature` has already been accepted.
    pub fn contains(&self, signature: &Signature) -> bool {
        self.accepted.contains(signature)
    }

    /// Number of accepted signatures, the seed included.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Returns true if nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}
