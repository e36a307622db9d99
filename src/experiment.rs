//! Batch processing of several experiments extracted from one paper.
//!
//! Graphs and groupings arrive as two mappings keyed `experiment_1`,
//! `experiment_2`, … Each experiment is permuted independently; a malformed
//! experiment is reported in [`BatchOutcome::failures`] without affecting the
//! others.

use crate::core::KnowledgeGraph;
use crate::engine::{GroupSwap, PermutationEngine, PermutationSet};
use crate::error::{PermuteError, PermuteResult};
use crate::grouping::SemanticGroups;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, info_span, warn};

/// Knowledge graphs keyed by experiment name.
pub type ExperimentGraphs = IndexMap<String, KnowledgeGraph>;

/// Semantic groups keyed by experiment name.
pub type ExperimentGroups = IndexMap<String, SemanticGroups>;

/// Key of the `n`-th experiment (1-based).
pub fn experiment_key(n: usize) -> String {
    format!("experiment_{n}")
}

/// True if exactly `n` experiments were extracted.
pub fn has_n_experiments(graphs: &ExperimentGraphs, n: usize) -> bool {
    graphs.len() == n
}

/// Results of a batch, in the input order of the experiments.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful experiments.
    pub permutations: IndexMap<String, PermutationSet>,
    /// Experiments whose input was rejected.
    pub failures: IndexMap<String, PermuteError>,
}

impl BatchOutcome {
    /// True when every experiment succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Variant graphs per experiment.
    pub fn knowledge_graph_permutations(
        &self,
    ) -> IndexMap<&str, &BTreeMap<usize, KnowledgeGraph>> {
        self.permutations
            .iter()
            .map(|(name, set)| (name.as_str(), &set.unique_graphs))
            .collect()
    }

    /// Swap provenance per experiment.
    pub fn node_swaps_tracker(&self) -> IndexMap<&str, &BTreeMap<usize, Vec<GroupSwap>>> {
        self.permutations
            .iter()
            .map(|(name, set)| (name.as_str(), &set.swap_provenance))
            .collect()
    }

    /// Deviation scores per experiment.
    pub fn triple_deviation_pct(&self) -> IndexMap<&str, &BTreeMap<usize, f64>> {
        self.permutations
            .iter()
            .map(|(name, set)| (name.as_str(), &set.deviation_scores))
            .collect()
    }
}

impl PermutationEngine {
    /// Permutes every experiment of `graphs` with its grouping from `groups`.
    ///
    /// Experiments run on the rayon pool when `parallel_experiments` is set;
    /// the outcome order is the order of `graphs` either way.
    pub fn permute_experiments(
        &self,
        graphs: &ExperimentGraphs,
        groups: &ExperimentGroups,
    ) -> BatchOutcome {
        let jobs: Vec<(&String, &KnowledgeGraph)> = graphs.iter().collect();
        let run = |(name, graph): (&String, &KnowledgeGraph)| {
            let span = info_span!("experiment", name = name.as_str());
            let result = span.in_scope(|| self.permute_experiment(name, graph, groups));
            (name.clone(), result)
        };
        let results: Vec<(String, PermuteResult<PermutationSet>)> =
            if self.config().parallel_experiments {
                jobs.into_par_iter().map(run).collect()
            } else {
                jobs.into_iter().map(run).collect()
            };

        let mut outcome = BatchOutcome::default();
        for (name, result) in results {
            match result {
                Ok(set) => {
                    outcome.permutations.insert(name, set);
                }
                Err(err) => {
                    warn!(experiment = name.as_str(), error = %err, "experiment rejected");
                    outcome.failures.insert(name, err);
                }
            }
        }
        info!(
            experiments = graphs.len(),
            failed = outcome.failures.len(),
            "batch complete"
        );
        outcome
    }

    fn permute_experiment(
        &self,
        name: &str,
        graph: &KnowledgeGraph,
        groups: &ExperimentGroups,
    ) -> PermuteResult<PermutationSet> {
        let grouping = groups.get(name).ok_or_else(|| PermuteError::InvalidGrouping {
            group: name.to_string(),
            reason: "no semantic groups supplied for this experiment".to_string(),
        })?;
        self.permute(graph, grouping)
    }
}
