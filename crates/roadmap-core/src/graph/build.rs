//! Graph construction from a concept snapshot.
//!
//! # Overview
//!
//! [`ConceptGraph::build`] takes the concept mapping and the raw edge list
//! for one roadmap and derives dense adjacency structures from them:
//!
//! - forward adjacency: vertex → dependents, in edge-list order;
//! - reverse adjacency: vertex → prerequisites, in edge-list order;
//! - in-degree per vertex.
//!
//! ## Vertex Numbering
//!
//! Concepts get dense indices `0..concept_count` in insertion order, which
//! is the order every query reports results in. An edge endpoint that is
//! not in the concept set still gets an index past `concept_count` so the
//! adjacency stays a pair of exact transposes, but such "dangling" vertices
//! are never traversal roots and never appear in query output.
//!
//! ## Duplicates
//!
//! A concept id seen twice keeps its first position and takes the later
//! name. Duplicate edges and self-loops are kept as given.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::DiGraph;
use tracing::{debug, instrument};

use crate::model::ConceptId;

// ---------------------------------------------------------------------------
// ConceptGraph
// ---------------------------------------------------------------------------

/// An immutable prerequisite graph over concept identifiers.
///
/// An edge `A → B` means "A is a prerequisite of B". All queries take
/// `&self` and never mutate, so a built graph can be shared across threads.
#[derive(Debug, Clone)]
pub struct ConceptGraph {
    /// Dense index → concept id. The first `concept_count` entries are the
    /// concept set; the rest are dangling edge endpoints.
    pub(crate) ids: Vec<ConceptId>,
    /// Display names for the concept set, parallel to `ids[..concept_count]`.
    pub(crate) names: Vec<String>,
    /// Concept id → dense index.
    pub(crate) index: HashMap<ConceptId, usize>,
    pub(crate) concept_count: usize,
    /// Edge list in input order, as dense `(prerequisite, dependent)` pairs.
    pub(crate) edges: Vec<(usize, usize)>,
    /// Vertex → dependents.
    pub(crate) forward: Vec<Vec<usize>>,
    /// Vertex → prerequisites.
    pub(crate) reverse: Vec<Vec<usize>>,
    /// Inbound edge count per vertex, fixed at construction.
    pub(crate) in_degree: Vec<usize>,
}

impl ConceptGraph {
    /// Build a graph from a concept mapping and a prerequisite edge list.
    ///
    /// `concepts` yields `(id, name)` pairs in the order results should be
    /// reported. `edges` yields `(prerequisite, dependent)` pairs. Edges that
    /// reference ids outside the concept set are accepted; see the module
    /// docs for how they are treated.
    ///
    /// Runs in time linear in concepts + edges and never fails.
    #[must_use]
    #[instrument(skip_all)]
    pub fn build<C, N, E>(concepts: C, edges: E) -> Self
    where
        C: IntoIterator<Item = (ConceptId, N)>,
        N: Into<String>,
        E: IntoIterator<Item = (ConceptId, ConceptId)>,
    {
        let concepts = concepts.into_iter();
        let mut ids: Vec<ConceptId> = Vec::with_capacity(concepts.size_hint().0);
        let mut names: Vec<String> = Vec::with_capacity(concepts.size_hint().0);
        let mut index: HashMap<ConceptId, usize> = HashMap::with_capacity(concepts.size_hint().0);

        for (id, name) in concepts {
            if let Some(&existing) = index.get(&id) {
                names[existing] = name.into();
                continue;
            }
            index.insert(id, ids.len());
            ids.push(id);
            names.push(name.into());
        }

        let concept_count = ids.len();
        let mut dense_edges: Vec<(usize, usize)> = Vec::new();

        for (from, to) in edges {
            let from_idx = vertex(&mut ids, &mut index, from);
            let to_idx = vertex(&mut ids, &mut index, to);
            dense_edges.push((from_idx, to_idx));
        }

        let mut forward: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut in_degree: Vec<usize> = vec![0; ids.len()];

        for &(from, to) in &dense_edges {
            forward[from].push(to);
            reverse[to].push(from);
            in_degree[to] += 1;
        }

        debug!(
            concepts = concept_count,
            edges = dense_edges.len(),
            dangling = ids.len() - concept_count,
            "built concept graph"
        );

        Self {
            ids,
            names,
            index,
            concept_count,
            edges: dense_edges,
            forward,
            reverse,
            in_degree,
        }
    }

    /// Return the number of concepts in the graph.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.concept_count
    }

    /// Return `true` if the concept set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.concept_count == 0
    }

    /// Return the number of edges, duplicates and dangling edges included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return `true` if `id` is in the concept set.
    #[must_use]
    pub fn contains(&self, id: ConceptId) -> bool {
        self.concept_index(id).is_some()
    }

    /// Return the display name of a concept.
    #[must_use]
    pub fn name(&self, id: ConceptId) -> Option<&str> {
        self.concept_index(id).map(|idx| self.names[idx].as_str())
    }

    /// Iterate over concept ids in insertion order.
    pub fn concept_ids(&self) -> impl Iterator<Item = ConceptId> + '_ {
        self.ids[..self.concept_count].iter().copied()
    }

    /// Iterate over the prerequisites of `id`, in edge-list order.
    ///
    /// Dangling ids are included since they were named by an edge.
    pub fn prerequisites(&self, id: ConceptId) -> impl Iterator<Item = ConceptId> + '_ {
        self.index
            .get(&id)
            .into_iter()
            .flat_map(move |&v| self.reverse[v].iter().map(move |&p| self.ids[p]))
    }

    /// Iterate over the concepts that list `id` as a prerequisite.
    pub fn dependents(&self, id: ConceptId) -> impl Iterator<Item = ConceptId> + '_ {
        self.index
            .get(&id)
            .into_iter()
            .flat_map(move |&v| self.forward[v].iter().map(move |&d| self.ids[d]))
    }

    /// Return the number of prerequisite edges pointing at `id`.
    #[must_use]
    pub fn prerequisite_count(&self, id: ConceptId) -> usize {
        self.index.get(&id).map_or(0, |&v| self.in_degree[v])
    }

    /// Project the graph into a petgraph [`DiGraph`].
    ///
    /// Node indices match the dense vertex numbering, so dangling endpoints
    /// are included after the concept set.
    #[must_use]
    pub fn to_digraph(&self) -> DiGraph<ConceptId, ()> {
        let mut graph = DiGraph::<ConceptId, ()>::with_capacity(self.ids.len(), self.edges.len());
        let nodes: Vec<_> = self.ids.iter().map(|&id| graph.add_node(id)).collect();
        for &(from, to) in &self.edges {
            graph.add_edge(nodes[from], nodes[to], ());
        }
        graph
    }

    pub(crate) fn concept_index(&self, id: ConceptId) -> Option<usize> {
        self.index
            .get(&id)
            .copied()
            .filter(|&idx| idx < self.concept_count)
    }

    pub(crate) const fn is_concept(&self, idx: usize) -> bool {
        idx < self.concept_count
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Return the dense index for `id`, appending a dangling vertex if unseen.
fn vertex(ids: &mut Vec<ConceptId>, index: &mut HashMap<ConceptId, usize>, id: ConceptId) -> usize {
    *index.entry(id).or_insert_with(|| {
        ids.push(id);
        ids.len() - 1
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
