//! Divergence of a variant from its original graph.
//!
//! Deviation is the fraction of a variant's triples that do not occur anywhere
//! in the original. Matching is presence-only: a variant triple counts as
//! matched if the original has it at least once, regardless of how often
//! either graph repeats it.

use crate::core::KnowledgeGraph;
use crate::error::{PermuteError, PermuteResult};
use crate::signature::{graph_triples, Triple};
use std::collections::HashMap;
use tracing::error;

/// Occurrence counts of the triples of one graph.
#[derive(Debug, Clone, Default)]
pub struct TripleCounts {
    counts: HashMap<Triple, usize>,
    total: usize,
}

impl TripleCounts {
    /// Counts the triples of `graph`.
    pub fn of(graph: &KnowledgeGraph) -> PermuteResult<Self> {
        Ok(Self::from_triples(graph_triples(graph)?))
    }

    /// Counts the given triples.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut counts = HashMap::new();
        let mut total = 0;
        for triple in triples {
            *counts.entry(triple).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    /// How often `triple` occurs.
    pub fn count(&self, triple: &Triple) -> usize {
        self.counts.get(triple).copied().unwrap_or(0)
    }

    /// Returns true if `triple` occurs at least once.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.counts.contains_key(triple)
    }

    /// Total number of triples counted, duplicates included.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of `candidate` absent from these counts.
    ///
    /// Both triple sequences must have the same length, since permutation
    /// only renames nodes. A mismatch means the transformer lost or invented
    /// edges and is reported as a consistency violation.
    pub fn deviation_of(&self, candidate: &[Triple]) -> PermuteResult<f64> {
        if candidate.len() != self.total {
            error!(
                original = self.total,
                candidate = candidate.len(),
                "triple count changed under permutation"
            );
            return Err(PermuteError::Consistency(format!(
                "candidate has {} triples, original has {}",
                candidate.len(),
                self.total
            )));
        }
        if candidate.is_empty() {
            return Ok(0.0);
        }
        let mismatches = candidate
            .iter()
            .filter(|triple| !self.contains(triple))
            .count();
        Ok(mismatches as f64 / candidate.len() as f64)
    }
}

/// Fraction of `candidate`'s triples absent from `original`, in `[0, 1]`.
pub fn deviation_from_original(
    candidate: &KnowledgeGraph,
    original: &KnowledgeGraph,
) -> PermuteResult<f64> {
    TripleCounts::of(original)?.deviation_of(&graph_triples(candidate)?)
}
