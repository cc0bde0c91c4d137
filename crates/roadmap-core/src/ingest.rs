//! Acceptance pipeline for generated roadmaps.
//!
//! A roadmap reaches storage only after [`prepare_roadmap`] accepts it. The
//! checks run in a fixed order and the first failure wins:
//!
//! 1. topic is not blank
//! 2. concept count is within the configured range
//! 3. concept ids are unique
//! 4. difficulties are in `1..=5` (when enforced)
//! 5. dependencies name known concepts (dropped or rejected per config)
//! 6. the prerequisite graph is acyclic
//!
//! [`Ingestor`] wraps the pipeline between a generator and a sink. A
//! rejected roadmap never reaches the sink.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::IngestConfig;
use crate::error::RoadmapError;
use crate::model::{ConceptId, DependencySpec, RoadmapDocument, TopicId};
use crate::source::{RoadmapGenerator, RoadmapSink};

const DIFFICULTY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Outcome of a successful ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub topic_id: TopicId,
    pub topic_name: String,
    pub concept_count: usize,
    pub edge_count: usize,
    pub is_valid_dag: bool,
}

/// Check `document` against `config` and return the accepted form.
///
/// The accepted document differs from the input only when dangling
/// dependencies were dropped.
///
/// # Errors
///
/// Returns the first [`RoadmapError`] rejection, in the order listed in the
/// module docs.
#[instrument(skip_all, fields(topic = %document.topic, concepts = document.concepts.len()))]
pub fn prepare_roadmap(
    config: &IngestConfig,
    mut document: RoadmapDocument,
) -> Result<RoadmapDocument, RoadmapError> {
    if document.topic.trim().is_empty() {
        return Err(RoadmapError::EmptyTopic);
    }

    let count = document.concepts.len();
    if count < config.min_concepts || count > config.max_concepts {
        return Err(RoadmapError::ConceptLimit {
            count,
            min: config.min_concepts,
            max: config.max_concepts,
        });
    }

    let mut known: HashSet<ConceptId> = HashSet::with_capacity(count);
    for concept in &document.concepts {
        if !known.insert(concept.id) {
            return Err(RoadmapError::DuplicateConcept { id: concept.id });
        }
    }

    if let Some(concept) = document
        .concepts
        .iter()
        .find(|c| config.enforce_difficulty && !DIFFICULTY_RANGE.contains(&c.difficulty))
    {
        return Err(RoadmapError::InvalidDifficulty {
            id: concept.id,
            difficulty: concept.difficulty,
        });
    }

    let is_known = |dep: &DependencySpec| known.contains(&dep.from) && known.contains(&dep.to);
    if config.drop_dangling_edges {
        let before = document.dependencies.len();
        document.dependencies.retain(is_known);
        let dropped = before - document.dependencies.len();
        if dropped > 0 {
            warn!(dropped, "dropped dependencies that reference unknown concepts");
        }
    } else if let Some(dep) = document.dependencies.iter().find(|&dep| !is_known(dep)) {
        return Err(RoadmapError::DanglingDependency {
            from: dep.from,
            to: dep.to,
        });
    }

    let graph = document.snapshot().graph();
    if !graph.is_valid_dag() {
        let cycles = graph.find_cycles();
        warn!(cycles = cycles.len(), "rejected cyclic roadmap");
        return Err(RoadmapError::CycleDetected { cycles });
    }

    Ok(document)
}

/// Generates, checks and stores roadmaps for topic names.
#[derive(Debug)]
pub struct Ingestor<G, S> {
    generator: G,
    sink: S,
    config: IngestConfig,
}

impl<G: RoadmapGenerator, S: RoadmapSink> Ingestor<G, S> {
    #[must_use]
    pub const fn new(generator: G, sink: S, config: IngestConfig) -> Self {
        Self {
            generator,
            sink,
            config,
        }
    }

    /// Generate a roadmap for `topic`, validate it and save it.
    ///
    /// The sink is called at most once, and only for an accepted roadmap.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::EmptyTopic`] for a blank topic,
    /// [`RoadmapError::GenerationFailed`] if the generator fails, any
    /// [`prepare_roadmap`] rejection, or the sink's error.
    #[instrument(skip(self))]
    pub fn ingest(&mut self, topic: &str) -> Result<IngestSummary> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RoadmapError::EmptyTopic.into());
        }

        let document = self
            .generator
            .generate(topic)
            .map_err(|err| RoadmapError::GenerationFailed {
                reason: format!("{err:#}"),
            })?;
        let document = prepare_roadmap(&self.config, document)?;

        let topic_id = self.sink.save(&document)?;
        let summary = IngestSummary {
            topic_id,
            topic_name: document.topic.clone(),
            concept_count: document.concepts.len(),
            edge_count: document.dependencies.len(),
            is_valid_dag: true,
        };
        info!(
            topic_id,
            concepts = summary.concept_count,
            edges = summary.edge_count,
            "ingested roadmap"
        );
        Ok(summary)
    }

    /// Consume the ingestor and return its sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}
