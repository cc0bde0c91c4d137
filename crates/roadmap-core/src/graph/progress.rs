//! Progress-aware queries: what a learner can start now, and what is one
//! step away.
//!
//! Both queries walk the concept set in insertion order and look only at
//! each concept's prerequisite list, so they are O(V+E). Membership in the
//! caller's mastery set is the only primitive; ids in the set are not
//! checked against the concept set.
//!
//! Concepts with no prerequisites are never reported by either query: they
//! are always available and take no part in an unlock transition.

use std::collections::HashSet;
use std::hash::BuildHasher;

use crate::graph::build::ConceptGraph;
use crate::model::ConceptId;

/// Both progress queries evaluated against one mastery set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Concepts whose prerequisites are all mastered.
    pub unlocked: Vec<ConceptId>,
    /// Concepts with exactly one unmastered prerequisite.
    pub frontier: Vec<ConceptId>,
}

impl ConceptGraph {
    /// Concepts exactly one unmastered prerequisite away from unlocking.
    ///
    /// A concept qualifies when it is not mastered, has at least one
    /// prerequisite, and exactly one entry of its prerequisite list is not
    /// in `mastered`. Duplicate edges count once per occurrence.
    #[must_use]
    pub fn frontier<S: BuildHasher>(&self, mastered: &HashSet<ConceptId, S>) -> Vec<ConceptId> {
        self.pending_concepts(mastered)
            .filter(|&(_, unmastered)| unmastered == 1)
            .map(|(id, _)| id)
            .collect()
    }

    /// Concepts that are learnable now.
    ///
    /// A concept qualifies when it is not mastered, has at least one
    /// prerequisite, and every prerequisite is in `mastered`.
    #[must_use]
    pub fn unlocked<S: BuildHasher>(&self, mastered: &HashSet<ConceptId, S>) -> Vec<ConceptId> {
        self.pending_concepts(mastered)
            .filter(|&(_, unmastered)| unmastered == 0)
            .map(|(id, _)| id)
            .collect()
    }

    /// Evaluate [`ConceptGraph::unlocked`] and [`ConceptGraph::frontier`] in
    /// one pass.
    #[must_use]
    pub fn progress<S: BuildHasher>(&self, mastered: &HashSet<ConceptId, S>) -> Progress {
        let mut progress = Progress::default();
        for (id, unmastered) in self.pending_concepts(mastered) {
            match unmastered {
                0 => progress.unlocked.push(id),
                1 => progress.frontier.push(id),
                _ => {}
            }
        }
        progress
    }

    /// Unmastered concepts with at least one prerequisite, paired with how
    /// many prerequisite entries are still unmastered.
    fn pending_concepts<'a, S: BuildHasher>(
        &'a self,
        mastered: &'a HashSet<ConceptId, S>,
    ) -> impl Iterator<Item = (ConceptId, usize)> + 'a {
        (0..self.concept_count).filter_map(move |node| {
            let id = self.ids[node];
            if mastered.contains(&id) || self.in_degree[node] == 0 {
                return None;
            }
            let unmastered = self.reverse[node]
                .iter()
                .filter(|&&p| !mastered.contains(&self.ids[p]))
                .count();
            Some((id, unmastered))
        })
    }
}
