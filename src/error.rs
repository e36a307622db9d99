//! Error types for the permutation engine.
//!
//! Malformed input aborts the invocation for one experiment only; consistency
//! violations indicate a transformer bug and are never coerced into a score.

use crate::core::NodeId;
use thiserror::Error;

/// Result alias used across the crate.
pub type PermuteResult<T> = std::result::Result<T, PermuteError>;

/// Error type for graph validation, permutation and persistence failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PermuteError {
    /// The knowledge graph violates a structural invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A semantic group does not fit the graph it was supplied with.
    #[error("invalid grouping in group `{group}`: {reason}")]
    InvalidGrouping {
        /// Name of the offending group.
        group: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An internal invariant was broken while transforming or scoring.
    #[error("consistency violation: {0}")]
    Consistency(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// CBOR (de)serialization error.
    #[error("cbor error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    /// Engine configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl PermuteError {
    /// Edge endpoint that names no node.
    pub(crate) fn dangling_endpoint(edge_index: usize, endpoint: NodeId) -> Self {
        Self::InvalidGraph(format!(
            "edge #{edge_index} references missing node {endpoint}"
        ))
    }

    /// Group member that names no node of the graph.
    pub(crate) fn missing_member(group: &str, id: NodeId) -> Self {
        Self::InvalidGrouping {
            group: group.to_string(),
            reason: format!("member {id} is not a node of the graph"),
        }
    }

    /// Returns true for the malformed-input variants.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidGraph(_) | Self::InvalidGrouping { .. })
    }
}
