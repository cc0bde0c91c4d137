//! Topic-level queries that resolve graph results to concept names.
//!
//! [`LearningPlanner`] loads a fresh snapshot from its [`GraphSource`] on
//! every call and builds a new [`ConceptGraph`](crate::graph::ConceptGraph)
//! from it. Nothing is cached, so a planner always reflects the current
//! contents of the source.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::RoadmapError;
use crate::model::{ConceptId, ConceptRef, GraphSnapshot, TopicId};
use crate::source::GraphSource;

/// Resolved progress for one learner on one topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    /// Mastered concepts that belong to the topic, in the caller's order.
    pub mastered: Vec<ConceptRef>,
    pub unlocked: Vec<ConceptRef>,
    pub frontier: Vec<ConceptRef>,
}

#[derive(Debug, Clone)]
pub struct LearningPlanner<S> {
    source: S,
}

impl<S: GraphSource> LearningPlanner<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// All concepts of `topic` in a valid study order.
    ///
    /// Concepts caught in or behind a prerequisite cycle are left out.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::TopicNotFound`] for an unknown topic, or the
    /// source's error if loading fails.
    #[instrument(skip(self))]
    pub fn learning_path(&self, topic: TopicId) -> Result<Vec<ConceptRef>> {
        let snapshot = self.load(topic)?;
        let order = snapshot.graph().topological_sort();
        debug!(concepts = order.len(), "computed learning path");
        Ok(snapshot.resolve(&order))
    }

    /// Concepts one unmastered prerequisite away from unlocking.
    ///
    /// # Errors
    ///
    /// Same as [`LearningPlanner::learning_path`].
    #[instrument(skip(self, mastered), fields(mastered = mastered.len()))]
    pub fn frontier(&self, topic: TopicId, mastered: &[ConceptId]) -> Result<Vec<ConceptRef>> {
        let snapshot = self.load(topic)?;
        let ids = snapshot.graph().frontier(&mastery_set(mastered));
        debug!(frontier = ids.len(), "computed frontier");
        Ok(snapshot.resolve(&ids))
    }

    /// Concepts whose prerequisites are all mastered.
    ///
    /// # Errors
    ///
    /// Same as [`LearningPlanner::learning_path`].
    #[instrument(skip(self, mastered), fields(mastered = mastered.len()))]
    pub fn unlocked(&self, topic: TopicId, mastered: &[ConceptId]) -> Result<Vec<ConceptRef>> {
        let snapshot = self.load(topic)?;
        let ids = snapshot.graph().unlocked(&mastery_set(mastered));
        debug!(unlocked = ids.len(), "computed unlocked concepts");
        Ok(snapshot.resolve(&ids))
    }

    /// Return `true` if the topic's prerequisites contain no cycle.
    ///
    /// # Errors
    ///
    /// Same as [`LearningPlanner::learning_path`].
    #[instrument(skip(self))]
    pub fn validate(&self, topic: TopicId) -> Result<bool> {
        let valid = self.load(topic)?.graph().is_valid_dag();
        debug!(valid, "validated topic");
        Ok(valid)
    }

    /// Mastered, unlocked and frontier concepts in one report.
    ///
    /// Mastered ids that are not concepts of the topic are dropped from the
    /// report but still count as mastered for the queries.
    ///
    /// # Errors
    ///
    /// Same as [`LearningPlanner::learning_path`].
    #[instrument(skip(self, mastered), fields(mastered = mastered.len()))]
    pub fn progress(&self, topic: TopicId, mastered: &[ConceptId]) -> Result<ProgressReport> {
        let snapshot = self.load(topic)?;
        let progress = snapshot.graph().progress(&mastery_set(mastered));
        debug!(
            unlocked = progress.unlocked.len(),
            frontier = progress.frontier.len(),
            "computed progress"
        );
        Ok(ProgressReport {
            mastered: snapshot.resolve(mastered),
            unlocked: snapshot.resolve(&progress.unlocked),
            frontier: snapshot.resolve(&progress.frontier),
        })
    }

    /// Raw `(prerequisite, dependent)` pairs of the topic, in load order.
    ///
    /// # Errors
    ///
    /// Same as [`LearningPlanner::learning_path`].
    pub fn edges(&self, topic: TopicId) -> Result<Vec<(ConceptId, ConceptId)>> {
        Ok(self.load(topic)?.edges)
    }

    fn load(&self, topic: TopicId) -> Result<GraphSnapshot> {
        let snapshot = self.source.load_graph(topic)?;
        if snapshot.is_empty() {
            return Err(RoadmapError::TopicNotFound { topic }.into());
        }
        Ok(snapshot)
    }
}

fn mastery_set(mastered: &[ConceptId]) -> HashSet<ConceptId> {
    mastered.iter().copied().collect()
}
