//! Node-id remapping of knowledge graphs.
//!
//! A permutation rewrites node ids only; edges keep their `source`/`target`
//! ids, which after the rewrite point at the renamed nodes. Each step returns
//! a fresh graph, so the input is never modified.

use crate::core::{KnowledgeGraph, NodeId};
use crate::enumerate::{Candidate, GroupOrdering};
use crate::error::{PermuteError, PermuteResult};
use std::collections::HashMap;

/// Applies one group ordering to a copy of `graph`.
///
/// Every node whose id appears in `old_order` takes the id at the same
/// position in `new_order`. The substitution is atomic, so it is correct for
/// permutations of any length, not only transpositions.
pub fn apply_permutation(
    graph: &KnowledgeGraph,
    old_order: &[NodeId],
    new_order: &[NodeId],
) -> PermuteResult<KnowledgeGraph> {
    let mapping = id_mapping(old_order, new_order)?;
    let mut permuted = graph.clone();
    for node in permuted.nodes_mut() {
        if let Some(&new_id) = mapping.get(&node.id) {
            node.id = new_id;
        }
    }
    Ok(permuted)
}

/// Applies every ordering of `candidate`, left to right, starting from `graph`.
pub fn apply_candidate(
    graph: &KnowledgeGraph,
    candidate: &Candidate<'_>,
) -> PermuteResult<KnowledgeGraph> {
    candidate
        .orderings
        .iter()
        .try_fold(graph.clone(), |working, ordering| {
            apply_ordering(&working, ordering)
        })
}

/// Applies a single group's ordering.
#[inline]
pub fn apply_ordering(
    graph: &KnowledgeGraph,
    ordering: &GroupOrdering<'_>,
) -> PermuteResult<KnowledgeGraph> {
    apply_permutation(graph, ordering.old_order, &ordering.new_order)
}

fn id_mapping(old_order: &[NodeId], new_order: &[NodeId]) -> PermuteResult<HashMap<NodeId, NodeId>> {
    if old_order.len() != new_order.len() {
        return Err(PermuteError::Consistency(format!(
            "ordering length mismatch: {} old ids, {} new ids",
            old_order.len(),
            new_order.len()
        )));
    }
    Ok(old_order.iter().copied().zip(new_order.iter().copied()).collect())
}
