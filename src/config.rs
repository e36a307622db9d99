//! Engine configuration.
//!
//! Every field has a default that reproduces the unbounded reference
//! behavior, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! max_subset_size = 2
//! max_permutations_per_group = 24
//! parallel_experiments = true
//!
//! [sampling]
//! max_samples = 10
//! seed = 42
//! ```

use crate::enumerate::EnumerationLimits;
use crate::error::PermuteResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration of the permutation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Largest number of groups permuted together (`None` = all).
    pub max_subset_size: Option<usize>,
    /// Orderings kept per group, identity first (`None` = all `n!`).
    pub max_permutations_per_group: Option<usize>,
    /// Process independent experiments on the rayon thread pool.
    pub parallel_experiments: bool,
    /// Downstream sampling of accepted variants.
    pub sampling: SamplingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_subset_size: None,
            max_permutations_per_group: None,
            parallel_experiments: true,
            sampling: SamplingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> PermuteResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> PermuteResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Enumeration caps derived from this configuration.
    pub fn limits(&self) -> EnumerationLimits {
        EnumerationLimits {
            max_subset_size: self.max_subset_size,
            max_permutations_per_group: self.max_permutations_per_group,
        }
    }

    /// Builder: cap the number of groups permuted together.
    pub fn with_max_subset_size(mut self, max: usize) -> Self {
        self.max_subset_size = Some(max);
        self
    }

    /// Builder: cap the orderings kept per group.
    pub fn with_max_permutations_per_group(mut self, max: usize) -> Self {
        self.max_permutations_per_group = Some(max);
        self
    }

    /// Builder: toggle parallel experiment processing.
    pub fn with_parallel_experiments(mut self, parallel: bool) -> Self {
        self.parallel_experiments = parallel;
        self
    }
}

/// Parameters of the seeded variant sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Maximum number of variants handed to the renderer.
    pub max_samples: usize,
    /// RNG seed; equal seeds give equal samples.
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_samples: 10,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PermuteError;

    #[test]
    fn empty_document_is_unbounded() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.limits(), EnumerationLimits::UNBOUNDED);
        assert_eq!(config.sampling.max_samples, 10);
        assert_eq!(config.sampling.seed, 42);
    }

    #[test]
    fn parses_caps_and_sampling() {
        let config = EngineConfig::from_toml_str(
            r#"
            max_subset_size = 2
            max_permutations_per_group = 24
            parallel_experiments = false

            [sampling]
            max_samples = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.max_subset_size, Some(2));
        assert_eq!(config.max_permutations_per_group, Some(24));
        assert!(!config.parallel_experiments);
        assert_eq!(config.sampling.max_samples, 5);
        assert_eq!(config.sampling.seed, 42);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = EngineConfig::from_toml_str("max_group_size = 3").unwrap_err();
        assert!(matches!(err, PermuteError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "max_subset_size = 1\n").unwrap();
        let config = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(config, EngineConfig::default().with_max_subset_size(1));
    }
}
