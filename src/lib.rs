//! kgpermute: node-swap variants of experiment knowledge graphs.
//!
//! Given a labeled graph describing an experiment's results and a partition of
//! its nodes into semantic groups with granularity levels, the engine
//! generates every structurally distinct graph obtainable by permuting
//! interchangeable nodes, deduplicates the results by their relation triples,
//! and scores each variant's divergence from the original.
//!
//! # Pipeline
//!
//! 1. [`grouping`]: resolve each group's swappable set (members at the
//!    finest level); groups with fewer than two are dropped.
//! 2. [`enumerate`]: visit every non-empty subset of groups and every
//!    combined ordering of their ids.
//! 3. [`transform`]: rename node ids on a copy of the graph, one group at a
//!    time.
//! 4. [`signature`]: reject candidates whose sorted triple sequence was
//!    already seen (the original seeds the seen set).
//! 5. [`deviation`]: score accepted variants by the fraction of triples
//!    absent from the original.
//!
//! Identity is established purely by id→label substitution; there is no
//! general isomorphism search. Enumeration is exhaustive unless capped via
//! [`EngineConfig`].
//!
//! # Example
//!
//! ```
//! use kgpermute::prelude::*;
//!
//! let mut graph = KnowledgeGraph::new();
//! graph.add_node(1, "A").unwrap();
//! graph.add_node(2, "B").unwrap();
//! graph.add_node(3, "C").unwrap();
//! graph.add_edge(1, 2, "causes").unwrap();
//! graph.add_edge(2, 3, "causes").unwrap();
//!
//! let groups = SemanticGroups::new().with_group(
//!     "g",
//!     vec![GroupMember::new(2, "B", 2), GroupMember::new(3, "C", 2)],
//! );
//!
//! let set = create_permutations(&graph, &groups).unwrap();
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.deviation_scores[&1], 1.0);
//! ```

pub mod config;
pub mod core;
pub mod deviation;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod experiment;
pub mod fingerprint;
pub mod grouping;
pub mod sampling;
pub mod signature;
pub mod store;
pub mod transform;

pub use crate::config::{EngineConfig, SamplingConfig};
pub use crate::core::{Edge, KnowledgeGraph, LabelIndex, Node, NodeId};
pub use crate::engine::{
    create_permutations, GroupSwap, PermutationEngine, PermutationRecord, PermutationSet,
    PermutationStats,
};
pub use crate::error::{PermuteError, PermuteResult};
pub use crate::grouping::{GroupMember, SemanticGroups, SwappableSet};
pub use crate::signature::{Signature, Triple};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::config::{EngineConfig, SamplingConfig};
    pub use crate::core::{Edge, KnowledgeGraph, LabelIndex, Node, NodeId};
    pub use crate::deviation::{deviation_from_original, TripleCounts};
    pub use crate::engine::{
        create_permutations, GroupSwap, PermutationEngine, PermutationRecord, PermutationSet,
        PermutationStats,
    };
    pub use crate::enumerate::{group_combinations, Candidate, Candidates, EnumerationLimits};
    pub use crate::error::{PermuteError, PermuteResult};
    pub use crate::experiment::{
        experiment_key, has_n_experiments, BatchOutcome, ExperimentGraphs, ExperimentGroups,
    };
    pub use crate::fingerprint::HashValue;
    pub use crate::grouping::{GroupMember, Level, SemanticGroups, SwappableSet, SwappableSets};
    pub use crate::sampling::sample_permutations;
    pub use crate::signature::{graph_triples, is_unique, signature, Signature, SignatureRegistry, Triple};
    pub use crate::transform::{apply_candidate, apply_permutation};
}
