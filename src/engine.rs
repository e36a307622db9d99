//! The permutation engine: enumerate, transform, deduplicate, score.
//!
//! `(graph, groups) → PermutationSet` is a pure function of its inputs. The
//! input graph and grouping are only borrowed, so the same objects can be
//! shared by concurrent invocations.

use crate::config::EngineConfig;
use crate::core::{KnowledgeGraph, LabelIndex};
use crate::deviation::TripleCounts;
use crate::enumerate::{candidate_count, group_combinations, Candidate, Candidates};
use crate::error::PermuteResult;
use crate::fingerprint::HashValue;
use crate::grouping::SemanticGroups;
use crate::signature::{graph_triples, Signature, SignatureRegistry};
use crate::transform::apply_candidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

/// Label-level record of one group's permutation.
///
/// Serialized as `[group_name, [[old_label, new_label], ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(String, Vec<(String, String)>)",
    into = "(String, Vec<(String, String)>)"
)]
pub struct GroupSwap {
    /// Group that was permuted.
    pub group: String,
    /// `(old label, new label)` per swappable position, in group order.
    pub swaps: Vec<(String, String)>,
}

impl From<(String, Vec<(String, String)>)> for GroupSwap {
    fn from((group, swaps): (String, Vec<(String, String)>)) -> Self {
        Self { group, swaps }
    }
}

impl From<GroupSwap> for (String, Vec<(String, String)>) {
    fn from(swap: GroupSwap) -> Self {
        (swap.group, swap.swaps)
    }
}

/// Counters describing one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermutationStats {
    /// Groups with at least two swappable ids.
    pub eligible_groups: usize,
    /// Group subsets enumerated.
    pub group_combinations: usize,
    /// Candidates transformed, identities included.
    pub total_candidates: usize,
    /// Candidates accepted as unique variants.
    pub unique_permutations: usize,
}

/// Accepted variants of one graph, keyed by 1-based discovery index.
///
/// The original graph is never included. All maps share the same key set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PermutationSet {
    /// Variant graphs.
    pub unique_graphs: BTreeMap<usize, KnowledgeGraph>,
    /// Groups permuted to reach each variant.
    pub swap_provenance: BTreeMap<usize, Vec<GroupSwap>>,
    /// Fraction of each variant's triples absent from the original.
    pub deviation_scores: BTreeMap<usize, f64>,
    /// Signature fingerprint of each variant.
    pub fingerprints: BTreeMap<usize, HashValue>,
    /// Run counters.
    pub stats: PermutationStats,
}

/// Borrowed view of one accepted variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PermutationRecord<'s> {
    /// Discovery index.
    pub index: usize,
    /// Variant graph.
    pub graph: &'s KnowledgeGraph,
    /// Swap provenance.
    pub swaps: &'s [GroupSwap],
    /// Deviation from the original.
    pub deviation: f64,
    /// Signature fingerprint.
    pub fingerprint: HashValue,
}

impl PermutationSet {
    /// Number of accepted variants.
    pub fn len(&self) -> usize {
        self.unique_graphs.len()
    }

    /// Returns true when no variant was accepted.
    pub fn is_empty(&self) -> bool {
        self.unique_graphs.is_empty()
    }

    /// Variant `index`, if accepted.
    pub fn record(&self, index: usize) -> Option<PermutationRecord<'_>> {
        Some(PermutationRecord {
            index,
            graph: self.unique_graphs.get(&index)?,
            swaps: self.swap_provenance.get(&index)?,
            deviation: *self.deviation_scores.get(&index)?,
            fingerprint: *self.fingerprints.get(&index)?,
        })
    }

    /// All variants in discovery order.
    pub fn records(&self) -> impl Iterator<Item = PermutationRecord<'_>> {
        self.unique_graphs
            .keys()
            .filter_map(move |&index| self.record(index))
    }

    /// Copy holding only the given indices; unknown indices are skipped.
    pub fn retain_indices(&self, indices: &[usize]) -> PermutationSet {
        let mut subset = PermutationSet {
            stats: self.stats,
            ..PermutationSet::default()
        };
        for record in indices.iter().filter_map(|&index| self.record(index)) {
            subset.push(
                record.index,
                record.graph.clone(),
                record.swaps.to_vec(),
                record.deviation,
                record.fingerprint,
            );
        }
        subset
    }

    fn push(
        &mut self,
        index: usize,
        graph: KnowledgeGraph,
        swaps: Vec<GroupSwap>,
        deviation: f64,
        fingerprint: HashValue,
    ) {
        self.unique_graphs.insert(index, graph);
        self.swap_provenance.insert(index, swaps);
        self.deviation_scores.insert(index, deviation);
        self.fingerprints.insert(index, fingerprint);
    }
}

/// Generates the structurally distinct node-swap variants of knowledge graphs.
#[derive(Debug, Clone, Default)]
pub struct PermutationEngine {
    config: EngineConfig,
}

impl PermutationEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enumerates, deduplicates and scores the variants of `graph`.
    ///
    /// # Errors
    /// - `InvalidGraph` / `InvalidGrouping` for malformed input.
    /// - `Consistency` if a transformed graph changed its triple count.
    ///
    /// Groups with fewer than two max-level members are skipped; if none
    /// remain the result is empty, which is not an error.
    pub fn permute(
        &self,
        graph: &KnowledgeGraph,
        groups: &SemanticGroups,
    ) -> PermuteResult<PermutationSet> {
        graph.validate()?;
        groups.validate_against(graph)?;

        let eligible = groups.swappable_sets().eligible()?;
        let limits = self.config.limits();
        let names: Vec<&str> = eligible.names().collect();
        let combinations = group_combinations(&names, limits.max_subset_size);
        info!(
            groups = eligible.len(),
            combinations = combinations.len(),
            expected_candidates = ?candidate_count(&eligible, limits),
            "enumerating graph permutations"
        );

        let labels = graph.label_index();
        let original = TripleCounts::of(graph)?;
        let mut registry = SignatureRegistry::seeded(graph)?;
        let mut set = PermutationSet::default();
        let mut total = 0usize;

        for combo in &combinations {
            debug!(groups = ?combo, "processing group combination");
            for candidate in Candidates::new(&eligible, combo, limits.max_permutations_per_group) {
                total += 1;
                let variant = apply_candidate(graph, &candidate)?;
                let signature = Signature::from_triples(graph_triples(&variant)?);
                if registry.contains(&signature) {
                    trace!(identity = candidate.is_identity(), "duplicate candidate");
                    continue;
                }
                let deviation = original.deviation_of(signature.triples())?;
                let fingerprint = signature.fingerprint();
                registry.admit(signature);

                let index = set.len() + 1;
                debug!(index, deviation, %fingerprint, "accepted permutation");
                set.push(
                    index,
                    variant,
                    swap_provenance(&candidate, &labels)?,
                    deviation,
                    fingerprint,
                );
            }
        }

        set.stats = PermutationStats {
            eligible_groups: eligible.len(),
            group_combinations: combinations.len(),
            total_candidates: total,
            unique_permutations: set.len(),
        };
        info!(
            total_candidates = total,
            unique_permutations = set.len(),
            "graph permutations complete"
        );
        Ok(set)
    }
}

/// Enumerates the variants of `graph` with the default (unbounded) configuration.
pub fn create_permutations(
    graph: &KnowledgeGraph,
    groups: &SemanticGroups,
) -> PermuteResult<PermutationSet> {
    PermutationEngine::default().permute(graph, groups)
}

/// Label pairs of every group in `candidate`, resolved against the original.
fn swap_provenance(
    candidate: &Candidate<'_>,
    labels: &LabelIndex<'_>,
) -> PermuteResult<Vec<GroupSwap>> {
    candidate
        .orderings
        .iter()
        .map(|ordering| {
            let swaps = ordering
                .old_order
                .iter()
                .zip(&ordering.new_order)
                .map(|(&old, &new)| {
                    Ok((labels.require(old)?.to_string(), labels.require(new)?.to_string()))
                })
                .collect::<PermuteResult<Vec<_>>>()?;
            Ok(GroupSwap {
                group: ordering.group.to_string(),
                swaps,
            })
        })
        .collect()
}
