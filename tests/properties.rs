//! Property tests for the permutation engine over small random graphs.

use kgpermute::enumerate::{candidate_count, group_combinations, Candidates, EnumerationLimits};
use kgpermute::prelude::*;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Once;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn node_id(position: usize) -> NodeId {
    NodeId::new(position as i64 * 3 + 1)
}

/// Graph of 3-7 nodes with a small label alphabet (so label collisions occur)
/// and up to two groups carved from the first nodes.
fn arb_input() -> impl Strategy<Value = (KnowledgeGraph, SemanticGroups)> {
    (3usize..=7)
        .prop_flat_map(|n| {
            let labels = prop::collection::vec(prop::sample::select(vec!["A", "B", "C", "D"]), n);
            let edges = prop::collection::vec(
                (0..n, 0..n, prop::sample::select(vec!["causes", "inhibits"])),
                0..8,
            );
            let first = 2usize..=3;
            let second = 0usize..=3;
            (Just(n), labels, edges, first, second)
        })
        .prop_map(|(n, labels, edges, first, second)| {
            let mut graph = KnowledgeGraph::new();
            for (position, label) in labels.iter().enumerate() {
                graph.add_node(node_id(position), *label).unwrap();
            }
            for (source, target, relation) in edges {
                graph.add_edge(node_id(source), node_id(target), relation).unwrap();
            }

            let member = |position: usize| GroupMember::new(node_id(position), labels[position], 2);
            let first = first.min(n);
            let second = second.min(n - first);
            let mut groups = SemanticGroups::new();
            groups.insert("first", (0..first).map(member).collect());
            if second > 0 {
                let mut members: Vec<_> = (first..first + second).map(member).collect();
                // A coarse member never takes part in swaps.
                members.push(GroupMember::new(node_id(0), labels[0], 1));
                groups.insert("second", members);
            }
            (graph, groups)
        })
}

fn triple_set(graph: &KnowledgeGraph) -> HashSet<Triple> {
    graph_triples(graph).unwrap().into_iter().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn accepted_variants_preserve_edge_count((graph, groups) in arb_input()) {
        init_tracing();
        let set = create_permutations(&graph, &groups).unwrap();
        for record in set.records() {
            prop_assert_eq!(record.graph.edge_count(), graph.edge_count());
            prop_assert_eq!(record.graph.node_count(), graph.node_count());
            prop_assert!(record.graph.validate().is_ok());
        }
    }

    #[test]
    fn accepted_signatures_are_pairwise_distinct((graph, groups) in arb_input()) {
        let set = create_permutations(&graph, &groups).unwrap();
        let original = signature(&graph).unwrap();
        let mut seen = HashSet::new();
        for record in set.records() {
            let sig = signature(record.graph).unwrap();
            prop_assert_ne!(&sig, &original);
            prop_assert!(seen.insert(sig));
        }
        prop_assert_eq!(seen.len(), set.stats.unique_permutations);
    }

    #[test]
    fn deviation_is_bounded_and_presence_based((graph, groups) in arb_input()) {
        let set = create_permutations(&graph, &groups).unwrap();
        let original = triple_set(&graph);
        for record in set.records() {
            prop_assert!((0.0..=1.0).contains(&record.deviation));
            let candidate = triple_set(record.graph);
            prop_assert_eq!(record.deviation == 0.0, candidate.is_subset(&original));
            if candidate == original {
                prop_assert_eq!(record.deviation, 0.0);
            }
        }
    }

    #[test]
    fn single_group_variants_keep_foreign_endpoints((graph, groups) in arb_input()) {
        let set = create_permutations(&graph, &groups).unwrap();
        let eligible = groups.swappable_sets().eligible().unwrap();
        let before = graph_triples(&graph).unwrap();
        for record in set.records().filter(|record| record.swaps.len() == 1) {
            let ids: HashSet<NodeId> = eligible
                .get(&record.swaps[0].group)
                .unwrap()
                .ids
                .iter()
                .copied()
                .collect();
            let after = graph_triples(record.graph).unwrap();
            for ((edge, old), new) in graph.edges().iter().zip(&before).zip(&after) {
                prop_assert_eq!(&old.relation, &new.relation);
                if !ids.contains(&edge.source) {
                    prop_assert_eq!(&old.source, &new.source);
                }
                if !ids.contains(&edge.target) {
                    prop_assert_eq!(&old.target, &new.target);
                }
            }
        }
    }

    #[test]
    fn accepted_set_is_every_distinct_non_original_signature((graph, groups) in arb_input()) {
        let set = create_permutations(&graph, &groups).unwrap();
        let eligible = groups.swappable_sets().eligible().unwrap();
        let names: Vec<&str> = eligible.names().collect();

        let original = signature(&graph).unwrap();
        let mut brute_force = HashSet::new();
        let mut visited = 0usize;
        for combo in group_combinations(&names, None) {
            for candidate in Candidates::new(&eligible, &combo, None) {
                visited += 1;
                let variant = apply_candidate(&graph, &candidate).unwrap();
                let sig = signature(&variant).unwrap();
                if candidate.is_identity() {
                    prop_assert_eq!(&sig, &original);
                }
                if sig != original {
                    brute_force.insert(sig);
                }
            }
        }
        let accepted: HashSet<_> = set
            .records()
            .map(|record| signature(record.graph).unwrap())
            .collect();
        prop_assert_eq!(accepted, brute_force);
        prop_assert_eq!(visited, set.stats.total_candidates);
        prop_assert_eq!(
            candidate_count(&eligible, EnumerationLimits::UNBOUNDED),
            Some(visited as u128)
        );
    }

    #[test]
    fn provenance_matches_the_variant((graph, groups) in arb_input()) {
        let set = create_permutations(&graph, &groups).unwrap();
        let labels: HashMap<NodeId, String> = graph
            .nodes()
            .iter()
            .map(|node| (node.id, node.label.clone()))
            .collect();
        let eligible = groups.swappable_sets().eligible().unwrap();
        for record in set.records() {
            for swap in record.swaps {
                let ids = &eligible.get(&swap.group).unwrap().ids;
                prop_assert_eq!(ids.len(), swap.swaps.len());
                for (id, (old_label, _)) in ids.iter().zip(&swap.swaps) {
                    prop_assert_eq!(&labels[id], old_label);
                }
            }
        }
    }
}

#[test]
fn inputs_are_shared_across_threads() {
    init_tracing();
    let mut graph = KnowledgeGraph::new();
    for (id, label) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
        graph.add_node(id, label).unwrap();
    }
    graph.add_edge(1, 2, "causes").unwrap();
    graph.add_edge(3, 4, "causes").unwrap();
    let groups = SemanticGroups::new().with_group(
        "g",
        vec![
            GroupMember::new(1, "A", 1),
            GroupMember::new(2, "B", 1),
            GroupMember::new(3, "C", 1),
        ],
    );
    let expected = create_permutations(&graph, &groups).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| create_permutations(&graph, &groups).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
