//! Cycle detection over the prerequisite graph.
//!
//! [`ConceptGraph::is_valid_dag`] is the acceptance check: an iterative
//! depth-first scan with three marks per vertex. [`ConceptGraph::find_cycles`]
//! explains a rejection by listing the strongly connected components that
//! contain a cycle.

#![allow(clippy::module_name_repetitions)]

use petgraph::algo::tarjan_scc;

use crate::graph::build::ConceptGraph;
use crate::model::ConceptId;

/// Traversal state for one vertex during the cycle scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

impl ConceptGraph {
    /// Return `true` if no directed cycle is reachable from any concept.
    ///
    /// Every concept is tried as a root in insertion order, skipping those
    /// already finished from an earlier root, so disconnected components are
    /// all covered. An edge back to a vertex on the current path is a cycle
    /// and ends the scan early. Self-loops count.
    ///
    /// Uses an explicit stack of `(vertex, next-edge cursor)` frames, so
    /// depth is bounded by memory rather than the call stack. O(V+E).
    #[must_use]
    pub fn is_valid_dag(&self) -> bool {
        let mut marks = vec![Mark::Unvisited; self.ids.len()];
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.concept_count {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            marks[root] = Mark::OnPath;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;

                let Some(&next) = self.forward[node].get(cursor) else {
                    // All edges out of `node` explored.
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[next] {
                    Mark::OnPath => return false,
                    Mark::Unvisited => {
                        marks[next] = Mark::OnPath;
                        stack.push((next, 0));
                    }
                    Mark::Done => {}
                }
            }
        }

        true
    }

    /// Find all cycles currently present in the graph.
    ///
    /// Each entry is the sorted member list of one strongly connected
    /// component with more than one vertex, or a single vertex with a
    /// self-loop. Entries are sorted. Dangling endpoints are listed when
    /// they sit on a cycle through at least one concept; a loop made only of
    /// dangling endpoints is not reported, matching [`Self::is_valid_dag`].
    /// Empty for a DAG.
    #[must_use]
    pub fn find_cycles(&self) -> Vec<Vec<ConceptId>> {
        let graph = self.to_digraph();

        let mut cycles: Vec<Vec<ConceptId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.iter().any(|node| self.is_concept(node.index()))
            })
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| graph.find_edge(node, node).is_some())
            })
            .map(|component| {
                let mut members: Vec<ConceptId> =
                    component.into_iter().map(|idx| graph[idx]).collect();
                members.sort_unstable();
                members
            })
            .collect();

        cycles.sort_unstable();
        cycles
    }
}
