//! Enumeration of group subsets and combined node orderings.
//!
//! For the eligible groups, every non-empty subset is visited by increasing
//! size and then lexicographically by position in the input order. For each
//! subset, every permutation of every group's swappable ids is combined with a
//! Cartesian product in group order (last group varies fastest). A subset of
//! groups with set sizes `n_1..n_k` therefore yields `∏ n_i!` candidates,
//! identity orderings included.
//!
//! Enumeration is lazy: candidates are produced one at a time so memory is
//! bounded by the per-group permutation lists, not by the product.

use crate::core::NodeId;
use crate::grouping::SwappableSets;
use serde::{Deserialize, Serialize};

/// Optional caps on the enumeration. `None` means unbounded.
///
/// With both caps unset the enumeration is the full power set times the full
/// permutation product, which grows factorially with group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumerationLimits {
    /// Largest number of groups permuted together.
    pub max_subset_size: Option<usize>,
    /// Number of orderings (lexicographic, identity first) kept per group.
    pub max_permutations_per_group: Option<usize>,
}

impl EnumerationLimits {
    /// No caps.
    pub const UNBOUNDED: Self = Self {
        max_subset_size: None,
        max_permutations_per_group: None,
    };
}

/// One group's contribution to a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrdering<'a> {
    /// Group name.
    pub group: &'a str,
    /// The group's swappable ids in input order.
    pub old_order: &'a [NodeId],
    /// The permuted ids; position `i` replaces `old_order[i]`.
    pub new_order: Vec<NodeId>,
}

impl GroupOrdering<'_> {
    /// True when the ordering leaves every id in place.
    pub fn is_identity(&self) -> bool {
        self.old_order == self.new_order.as_slice()
    }
}

/// A candidate transformation: one ordering per group of a subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Orderings in group order.
    pub orderings: Vec<GroupOrdering<'a>>,
}

impl Candidate<'_> {
    /// True when every group keeps its original order.
    pub fn is_identity(&self) -> bool {
        self.orderings.iter().all(GroupOrdering::is_identity)
    }

    /// Group names touched by this candidate.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.orderings.iter().map(|ordering| ordering.group)
    }
}

/// Every non-empty subset of `names` up to `max_size` elements.
///
/// Subsets are ordered by size, then lexicographically by position; element
/// order inside a subset follows `names`.
pub fn group_combinations<'a>(names: &[&'a str], max_size: Option<usize>) -> Vec<Vec<&'a str>> {
    let upper = max_size.map_or(names.len(), |max| max.min(names.len()));
    let mut out = Vec::new();
    for size in 1..=upper {
        push_combinations(names, size, &mut out);
    }
    out
}

fn push_combinations<'a>(names: &[&'a str], size: usize, out: &mut Vec<Vec<&'a str>>) {
    let n = names.len();
    let mut idx: Vec<usize> = (0..size).collect();
    loop {
        out.push(idx.iter().map(|&i| names[i]).collect());
        // Rightmost position that can still advance.
        let mut i = size;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if idx[i] != i + n - size {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..size {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Lexicographic (by position) permutations of a slice of ids.
///
/// The first item is the identity ordering. An empty slice yields a single
/// empty ordering.
#[derive(Debug, Clone)]
pub struct Permutations<'a> {
    items: &'a [NodeId],
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Permutations<'a> {
    /// Starts at the identity ordering of `items`.
    pub fn new(items: &'a [NodeId]) -> Self {
        Self {
            items,
            indices: (0..items.len()).collect(),
            done: false,
        }
    }
}

impl Iterator for Permutations<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.items[i]).collect();
        if !next_permutation(&mut self.indices) {
            self.done = true;
        }
        Some(current)
    }
}

/// Advances `indices` to the next lexicographic permutation in place.
///
/// Returns false once the last permutation has been reached.
fn next_permutation(indices: &mut [usize]) -> bool {
    if indices.len() < 2 {
        return false;
    }
    let mut i = indices.len() - 1;
    while i > 0 && indices[i - 1] >= indices[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = indices.len() - 1;
    while indices[j] <= indices[i - 1] {
        j -= 1;
    }
    indices.swap(i - 1, j);
    indices[i..].reverse();
    true
}

/// Cartesian product of per-group permutations for one subset of groups.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    groups: Vec<(&'a str, &'a [NodeId], Vec<Vec<NodeId>>)>,
    cursor: Vec<usize>,
    done: bool,
}

impl<'a> Candidates<'a> {
    /// Enumerates the candidates of `subset`, skipping names absent from `sets`.
    pub fn new(
        sets: &'a SwappableSets,
        subset: &[&'a str],
        max_permutations_per_group: Option<usize>,
    ) -> Self {
        let groups: Vec<_> = subset
            .iter()
            .filter_map(|&name| sets.get(name).map(|set| (name, set.ids.as_slice())))
            .map(|(name, ids)| {
                let perms = Permutations::new(ids);
                let perms: Vec<_> = match max_permutations_per_group {
                    Some(cap) => perms.take(cap).collect(),
                    None => perms.collect(),
                };
                (name, ids, perms)
            })
            .collect();
        let done = groups.is_empty() || groups.iter().any(|(_, _, perms)| perms.is_empty());
        Self {
            cursor: vec![0; groups.len()],
            groups,
            done,
        }
    }

    /// Number of candidates this iterator yields in total.
    pub fn total(&self) -> usize {
        if self.groups.is_empty() {
            return 0;
        }
        self.groups.iter().map(|(_, _, perms)| perms.len()).product()
    }
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let orderings = self
            .groups
            .iter()
            .zip(&self.cursor)
            .map(|(&(group, old_order, ref perms), &at)| GroupOrdering {
                group,
                old_order,
                new_order: perms[at].clone(),
            })
            .collect();

        // Odometer step, last group fastest.
        let mut i = self.cursor.len();
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            self.cursor[i] += 1;
            if self.cursor[i] < self.groups[i].2.len() {
                break;
            }
            self.cursor[i] = 0;
        }

        Some(Candidate { orderings })
    }
}

/// Number of candidates the full enumeration will visit, if it fits in `u128`.
pub fn candidate_count(sets: &SwappableSets, limits: EnumerationLimits) -> Option<u128> {
    let per_group: Vec<u128> = sets
        .iter()
        .map(|(_, set)| {
            let full = factorial(set.len())?;
            Some(match limits.max_permutations_per_group {
                Some(cap) => full.min(cap as u128),
                None => full,
            })
        })
        .collect::<Option<_>>()?;
    let upper = limits
        .max_subset_size
        .map_or(per_group.len(), |max| max.min(per_group.len()));

    // Sum over subsets of the product of their members' counts: the
    // elementary symmetric polynomials e_1..e_upper of `per_group`.
    let mut elementary = vec![0u128; upper + 1];
    elementary[0] = 1;
    for &count in &per_group {
        for k in (1..=upper).rev() {
            let term = elementary[k - 1].checked_mul(count)?;
            elementary[k] = elementary[k].checked_add(term)?;
        }
    }
    elementary[1..]
        .iter()
        .try_fold(0u128, |acc, &e| acc.checked_add(e))
}

fn factorial(n: usize) -> Option<u128> {
    (1..=n as u128).try_fold(1u128, |acc, k| acc.checked_mul(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::{GroupMember, SemanticGroups};

    fn ids(raw: &[i64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    fn sets(sizes: &[(&str, &[i64])]) -> SwappableSets {
        let mut groups = SemanticGroups::new();
        for (name, members) in sizes {
            groups.insert(
                *name,
                members
                    .iter()
                    .map(|&id| GroupMember::new(id, format!("n{id}"), 1))
                    .collect(),
            );
        }
        groups.swappable_sets().eligible().unwrap()
    }

    #[test]
    fn combinations_by_size_then_position() {
        let combos = group_combinations(&["a", "b", "c"], None);
        assert_eq!(
            combos,
            vec![
                vec!["a"],
                vec!["b"],
                vec!["c"],
                vec!["a", "b"],
                vec!["a", "c"],
                vec!["b", "c"],
                vec!["a", "b", "c"],
            ]
        );
    }

    #[test]
    fn combinations_respect_cap() {
        let combos = group_combinations(&["a", "b", "c"], Some(1));
        assert_eq!(combos.len(), 3);
        assert!(group_combinations(&[], None).is_empty());
        assert_eq!(group_combinations(&["a", "b"], Some(10)).len(), 3);
    }

    #[test]
    fn permutations_are_lexicographic_by_position() {
        let items = ids(&[7, 3, 5]);
        let perms: Vec<_> = Permutations::new(&items).collect();
        assert_eq!(
            perms,
            vec![
                ids(&[7, 3, 5]),
                ids(&[7, 5, 3]),
                ids(&[3, 7, 5]),
                ids(&[3, 5, 7]),
                ids(&[5, 7, 3]),
                ids(&[5, 3, 7]),
            ]
        );
    }

    #[test]
    fn product_yields_factorial_count() {
        let sets = sets(&[("g1", &[1, 2, 3]), ("g2", &[4, 5])]);
        let all: Vec<_> = Candidates::new(&sets, &["g1", "g2"], None).collect();
        assert_eq!(all.len(), 12);
        assert!(all[0].is_identity());
        // Last group varies fastest.
        assert_eq!(all[1].orderings[0].new_order, ids(&[1, 2, 3]));
        assert_eq!(all[1].orderings[1].new_order, ids(&[5, 4]));
        assert_eq!(all.iter().filter(|c| c.is_identity()).count(), 1);
    }

    #[test]
    fn per_group_cap_truncates() {
        let sets = sets(&[("g1", &[1, 2, 3]), ("g2", &[4, 5])]);
        let capped = Candidates::new(&sets, &["g1", "g2"], Some(2));
        assert_eq!(capped.total(), 4);
        assert_eq!(capped.count(), 4);
        assert_eq!(Candidates::new(&sets, &["g1"], Some(0)).count(), 0);
    }

    #[test]
    fn counts_whole_enumeration() {
        let sets = sets(&[("g1", &[1, 2, 3]), ("g2", &[4, 5])]);
        // {g1}: 6, {g2}: 2, {g1, g2}: 12
        assert_eq!(candidate_count(&sets, EnumerationLimits::UNBOUNDED), Some(20));
        let limits = EnumerationLimits {
            max_subset_size: Some(1),
            max_permutations_per_group: None,
        };
        assert_eq!(candidate_count(&sets, limits), Some(8));
    }
}
