//! Property tests for the concept graph queries.
//!
//! Expected results are recomputed from the raw edge list with brute-force
//! reachability, independent of the graph's own adjacency.

use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;
use roadmap_core::ConceptId;

use generators::*;

fn position_map(order: &[ConceptId]) -> HashMap<ConceptId, usize> {
    order.iter().enumerate().map(|(i, id)| (*id, i)).collect()
}

/// Vertices reachable from `start` through at least one edge.
fn reachable(edges: &[(ConceptId, ConceptId)], start: ConceptId) -> HashSet<ConceptId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &(from, to) in edges {
            if from == node && seen.insert(to) {
                queue.push_back(to);
            }
        }
    }
    seen
}

/// Concepts that sit on a cycle or depend, directly or not, on one.
fn blocked(roadmap: &RawRoadmap) -> HashSet<ConceptId> {
    let on_cycle: Vec<ConceptId> = roadmap
        .ids()
        .into_iter()
        .filter(|&id| reachable(&roadmap.edges, id).contains(&id))
        .collect();
    let mut blocked: HashSet<ConceptId> = on_cycle.iter().copied().collect();
    for id in on_cycle {
        blocked.extend(reachable(&roadmap.edges, id));
    }
    blocked
}

fn unmastered_prerequisites(
    roadmap: &RawRoadmap,
    id: ConceptId,
    mastered: &HashSet<ConceptId>,
) -> (usize, usize) {
    let prerequisites: Vec<ConceptId> = roadmap
        .edges
        .iter()
        .filter(|&&(_, to)| to == id)
        .map(|&(from, _)| from)
        .collect();
    let unmastered = prerequisites
        .iter()
        .filter(|&&p| !mastered.contains(&p))
        .count();
    (prerequisites.len(), unmastered)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    // -----------------------------------------------------------------------
    // Acyclic input
    // -----------------------------------------------------------------------

    #[test]
    fn dag_is_valid(roadmap in arb_dag()) {
        let graph = roadmap.graph();
        prop_assert!(graph.is_valid_dag());
        prop_assert!(graph.find_cycles().is_empty());
    }

    #[test]
    fn dag_sort_is_permutation(roadmap in arb_dag()) {
        let mut sorted = roadmap.graph().topological_sort();
        let mut ids = roadmap.ids();
        sorted.sort_unstable();
        ids.sort_unstable();
        prop_assert_eq!(sorted, ids);
    }

    #[test]
    fn dag_sort_respects_every_edge(roadmap in arb_dag()) {
        let order = roadmap.graph().topological_sort();
        let position = position_map(&order);
        for (from, to) in &roadmap.edges {
            prop_assert!(
                position[from] < position[to],
                "{} must come before {} in {:?}", from, to, order
            );
        }
    }

    #[test]
    fn layers_partition_sort_and_respect_edges(roadmap in arb_dag()) {
        let graph = roadmap.graph();
        let layers = graph.learning_layers();

        let mut layer_of = HashMap::new();
        for (depth, layer) in layers.iter().enumerate() {
            prop_assert!(!layer.is_empty());
            for id in layer {
                prop_assert!(layer_of.insert(*id, depth).is_none(), "{} listed twice", id);
            }
        }
        prop_assert_eq!(layer_of.len(), roadmap.concepts.len());
        for (from, to) in &roadmap.edges {
            prop_assert!(layer_of[from] < layer_of[to]);
        }
    }

    // -----------------------------------------------------------------------
    // Cyclic input
    // -----------------------------------------------------------------------

    #[test]
    fn cyclic_is_invalid_and_sort_is_shorter(roadmap in arb_cyclic()) {
        let graph = roadmap.graph();
        prop_assert!(!graph.is_valid_dag());

        let sorted = graph.topological_sort();
        prop_assert!(sorted.len() < roadmap.concepts.len());
    }

    #[test]
    fn cyclic_sort_excludes_exactly_blocked_concepts(roadmap in arb_cyclic()) {
        let blocked = blocked(&roadmap);
        let expected: HashSet<ConceptId> = roadmap
            .ids()
            .into_iter()
            .filter(|id| !blocked.contains(id))
            .collect();

        let sorted = roadmap.graph().topological_sort();
        let actual: HashSet<ConceptId> = sorted.iter().copied().collect();
        prop_assert_eq!(actual.len(), sorted.len(), "sort repeats a concept");
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn reported_cycles_cover_exactly_cycle_members(roadmap in arb_cyclic()) {
        let members: HashSet<ConceptId> = roadmap
            .graph()
            .find_cycles()
            .into_iter()
            .flatten()
            .collect();
        let expected: HashSet<ConceptId> = roadmap
            .ids()
            .into_iter()
            .filter(|&id| reachable(&roadmap.edges, id).contains(&id))
            .collect();
        prop_assert_eq!(members, expected);
    }

    // -----------------------------------------------------------------------
    // Progress queries
    // -----------------------------------------------------------------------

    #[test]
    fn unlocked_matches_definition((roadmap, mastered) in arb_dag_with_mastery()) {
        let unlocked: HashSet<ConceptId> =
            roadmap.graph().unlocked(&mastered).into_iter().collect();
        for id in roadmap.ids() {
            let (total, unmastered) = unmastered_prerequisites(&roadmap, id, &mastered);
            let expected = !mastered.contains(&id) && total > 0 && unmastered == 0;
            prop_assert_eq!(unlocked.contains(&id), expected, "concept {}", id);
        }
    }

    #[test]
    fn frontier_matches_definition((roadmap, mastered) in arb_dag_with_mastery()) {
        let frontier: HashSet<ConceptId> =
            roadmap.graph().frontier(&mastered).into_iter().collect();
        for id in roadmap.ids() {
            let (_, unmastered) = unmastered_prerequisites(&roadmap, id, &mastered);
            let expected = !mastered.contains(&id) && unmastered == 1;
            prop_assert_eq!(frontier.contains(&id), expected, "concept {}", id);
        }
    }

    #[test]
    fn frontier_and_unlocked_are_disjoint((roadmap, mastered) in arb_dag_with_mastery()) {
        let graph = roadmap.graph();
        let unlocked: HashSet<ConceptId> = graph.unlocked(&mastered).into_iter().collect();
        for id in graph.frontier(&mastered) {
            prop_assert!(!unlocked.contains(&id), "{} in both sets", id);
        }
    }

    #[test]
    fn progress_agrees_with_queries((roadmap, mastered) in arb_dag_with_mastery()) {
        let graph = roadmap.graph();
        let progress = graph.progress(&mastered);
        prop_assert_eq!(progress.unlocked, graph.unlocked(&mastered));
        prop_assert_eq!(progress.frontier, graph.frontier(&mastered));
    }

    #[test]
    fn queries_are_idempotent((roadmap, mastered) in arb_dag_with_mastery()) {
        let graph = roadmap.graph();
        prop_assert_eq!(graph.is_valid_dag(), graph.is_valid_dag());
        prop_assert_eq!(graph.topological_sort(), graph.topological_sort());
        prop_assert_eq!(graph.frontier(&mastered), graph.frontier(&mastered));
        prop_assert_eq!(graph.unlocked(&mastered), graph.unlocked(&mastered));
    }

    #[test]
    fn rebuilt_graph_answers_identically((roadmap, mastered) in arb_dag_with_mastery()) {
        let first = roadmap.graph();
        let second = roadmap.graph();
        prop_assert_eq!(first.topological_sort(), second.topological_sort());
        prop_assert_eq!(first.progress(&mastered), second.progress(&mastered));
    }
}
