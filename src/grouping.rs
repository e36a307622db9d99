//! Semantic groups and swappable-set resolution.
//!
//! A semantic group clusters nodes that are interchangeable at some
//! granularity. Only the finest-grained members (those at the group's maximum
//! `level`) are permutable; they form the group's swappable set.

use crate::core::{KnowledgeGraph, NodeId};
use crate::error::{PermuteError, PermuteResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Granularity rank of a node within its group (1 = coarsest).
pub type Level = u32;

/// One member of a semantic group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMember {
    /// Id of the graph node.
    pub id: NodeId,
    /// Label as reported by the grouping collaborator.
    pub label: String,
    /// Granularity level.
    pub level: Level,
}

impl GroupMember {
    /// Creates a member.
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            level,
        }
    }
}

/// Named semantic groups in their input order.
///
/// Serialized as a JSON object `{group_name: [{id, label, level}]}`; the
/// object's key order is the enumeration order of the groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticGroups {
    groups: IndexMap<String, Vec<GroupMember>>,
}

impl SemanticGroups {
    /// Creates an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a group, keeping its original position if replaced.
    pub fn insert(&mut self, name: impl Into<String>, members: Vec<GroupMember>) {
        self.groups.insert(name.into(), members);
    }

    /// Builder form of [`SemanticGroups::insert`].
    pub fn with_group(mut self, name: impl Into<String>, members: Vec<GroupMember>) -> Self {
        self.insert(name, members);
        self
    }

    /// Members of the named group.
    pub fn get(&self, name: &str) -> Option<&[GroupMember]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Groups in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GroupMember])> {
        self.groups
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true when there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Checks that every member references a node of `graph`.
    ///
    /// A member whose label disagrees with the graph's label is accepted (the
    /// graph is authoritative) but logged.
    pub fn validate_against(&self, graph: &KnowledgeGraph) -> PermuteResult<()> {
        let labels = graph.label_index();
        for (name, members) in self.iter() {
            for member in members {
                match labels.label(member.id) {
                    None => return Err(PermuteError::missing_member(name, member.id)),
                    Some(label) if label != member.label => {
                        warn!(
                            group = name,
                            id = member.id.as_i64(),
                            group_label = %member.label,
                            graph_label = label,
                            "group member label differs from graph label"
                        );
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Resolves the swappable set of every group, in input order.
    pub fn swappable_sets(&self) -> SwappableSets {
        let sets = self
            .iter()
            .map(|(name, members)| (name.to_string(), SwappableSet::from_members(members)))
            .collect();
        SwappableSets { sets }
    }
}

/// Ids sharing the maximum level within one group, in the group's order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwappableSet {
    /// The finest level present in the group, `None` for an empty group.
    pub level: Option<Level>,
    /// Member ids at that level.
    pub ids: Vec<NodeId>,
}

impl SwappableSet {
    /// Extracts the max-level members of a group.
    pub fn from_members(members: &[GroupMember]) -> Self {
        let level = members.iter().map(|member| member.level).max();
        let ids = match level {
            Some(max) => members
                .iter()
                .filter(|member| member.level == max)
                .map(|member| member.id)
                .collect(),
            None => Vec::new(),
        };
        Self { level, ids }
    }

    /// Number of interchangeable ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true for an empty group.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// A group needs at least two interchangeable ids to permute anything.
    #[inline]
    pub fn is_swappable(&self) -> bool {
        self.ids.len() >= 2
    }
}

/// Swappable sets keyed by group name, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SwappableSets {
    sets: IndexMap<String, SwappableSet>,
}

impl SwappableSets {
    /// Keeps only the groups with at least two interchangeable ids.
    ///
    /// Fails if an id repeats within one set, since the positional id mapping
    /// would then not be a permutation. Ids shared between different sets are
    /// logged; groups are then applied in order.
    pub fn eligible(&self) -> PermuteResult<SwappableSets> {
        let mut sets = IndexMap::new();
        let mut owner: HashMap<NodeId, &str> = HashMap::new();
        for (name, set) in &self.sets {
            if !set.is_swappable() {
                continue;
            }
            let mut seen = HashSet::with_capacity(set.len());
            for &id in &set.ids {
                if !seen.insert(id) {
                    return Err(PermuteError::InvalidGrouping {
                        group: name.clone(),
                        reason: format!("member {id} is listed more than once"),
                    });
                }
                if let Some(other) = owner.insert(id, name.as_str()) {
                    warn!(
                        id = id.as_i64(),
                        first = other,
                        second = name.as_str(),
                        "node is swappable in more than one group"
                    );
                }
            }
            sets.insert(name.clone(), set.clone());
        }
        Ok(SwappableSets { sets })
    }

    /// Swappable set of the named group.
    pub fn get(&self, name: &str) -> Option<&SwappableSet> {
        self.sets.get(name)
    }

    /// Group names in input order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Sets in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SwappableSet)> {
        self.sets.iter().map(|(name, set)| (name.as_str(), set))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true when no group is present.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
