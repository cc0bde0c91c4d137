//! Learning order: topological sort and parallel study layers.
//!
//! Both queries run Kahn's algorithm over in-degrees recomputed from the
//! edge list, so they never depend on counts cached at construction.
//!
//! # Cycles
//!
//! Concepts inside a cycle, or downstream of one, never reach in-degree zero
//! and are silently left out. A concept whose prerequisite is a dangling id
//! is left out for the same reason. Call
//! [`ConceptGraph::is_valid_dag`] first when completeness matters.

use std::collections::VecDeque;

use tracing::debug;

use crate::graph::build::ConceptGraph;
use crate::model::ConceptId;

impl ConceptGraph {
    /// Return one valid learning order of the concepts.
    ///
    /// Seeds a FIFO queue with every zero in-degree concept in insertion
    /// order, then repeatedly emits the front vertex and releases its
    /// dependents in edge-list order. Ties are therefore broken by the order
    /// concepts became eligible, which is deterministic for a given input.
    ///
    /// On a cyclic graph the result is shorter than [`ConceptGraph::len`].
    /// O(V+E).
    #[must_use]
    pub fn topological_sort(&self) -> Vec<ConceptId> {
        let mut in_degree = self.edge_in_degrees();

        let mut queue: VecDeque<usize> = (0..self.concept_count)
            .filter(|&v| in_degree[v] == 0)
            .collect();
        let mut order: Vec<ConceptId> = Vec::with_capacity(self.concept_count);

        while let Some(node) = queue.pop_front() {
            order.push(self.ids[node]);
            for &next in &self.forward[node] {
                if !self.is_concept(next) {
                    continue;
                }
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() < self.concept_count {
            debug!(
                placed = order.len(),
                omitted = self.concept_count - order.len(),
                "topological sort left concepts unplaced"
            );
        }

        order
    }

    /// Group concepts into layers that can be studied in parallel.
    ///
    /// Layer 0 holds every concept without prerequisites; layer `k` holds
    /// the concepts whose prerequisites all sit in earlier layers. Within a
    /// layer concepts keep insertion order. The concatenated layers contain
    /// exactly the concepts [`ConceptGraph::topological_sort`] emits.
    #[must_use]
    pub fn learning_layers(&self) -> Vec<Vec<ConceptId>> {
        let mut in_degree = self.edge_in_degrees();

        let mut ready: Vec<usize> = (0..self.concept_count)
            .filter(|&v| in_degree[v] == 0)
            .collect();
        let mut layers: Vec<Vec<ConceptId>> = Vec::new();

        while !ready.is_empty() {
            let current = std::mem::take(&mut ready);

            for &node in &current {
                for &next in &self.forward[node] {
                    if !self.is_concept(next) {
                        continue;
                    }
                    in_degree[next] -= 1;
                    if in_degree[next] == 0 {
                        ready.push(next);
                    }
                }
            }

            ready.sort_unstable();
            layers.push(current.into_iter().map(|v| self.ids[v]).collect());
        }

        layers
    }

    /// In-degree per vertex counted straight from the edge list, restricted
    /// to edges that land on a concept.
    fn edge_in_degrees(&self) -> Vec<usize> {
        let mut in_degree = vec![0_usize; self.ids.len()];
        for &(_, to) in &self.edges {
            if self.is_concept(to) {
                in_degree[to] += 1;
            }
        }
        in_degree
    }
}
