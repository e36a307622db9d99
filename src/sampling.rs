//! Seeded sampling of accepted variants.
//!
//! The rendering stage only consumes a bounded number of variants per
//! experiment. Sampling is without replacement and deterministic for a fixed
//! seed; the chosen indices are returned in ascending order so they line up
//! with the other per-index maps.

use crate::config::SamplingConfig;
use crate::engine::PermutationSet;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Picks up to `max_samples` variant indices of `set`.
///
/// When the set holds fewer than `max_samples` variants every index is
/// returned.
pub fn sample_permutations(set: &PermutationSet, max_samples: usize, seed: u64) -> Vec<usize> {
    let keys: Vec<usize> = set.unique_graphs.keys().copied().collect();
    if keys.len() < max_samples {
        return keys;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: Vec<usize> = index::sample(&mut rng, keys.len(), max_samples)
        .into_iter()
        .map(|position| keys[position])
        .collect();
    chosen.sort_unstable();
    chosen
}

impl PermutationSet {
    /// Subset of this set chosen by [`sample_permutations`].
    pub fn sample(&self, config: &SamplingConfig) -> PermutationSet {
        let indices = sample_permutations(self, config.max_samples, config.seed);
        self.retain_indices(&indices)
    }
}
