//! Collaborator seams around the concept graph.
//!
//! The graph never talks to storage or to a generator directly. Callers
//! supply those capabilities through three narrow traits:
//!
//! - [`GraphSource`] loads the concepts and edges of one topic;
//! - [`RoadmapGenerator`] produces a new roadmap document for a topic name;
//! - [`RoadmapSink`] stores an accepted roadmap and returns its topic id.
//!
//! [`MemoryCatalog`] implements both ends of storage in memory.

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::model::{ConceptId, GraphSnapshot, RoadmapDocument, TopicId};

/// Loads the raw graph data for one topic.
pub trait GraphSource {
    /// Return the concepts and edges of `topic`.
    ///
    /// An unknown topic yields an empty snapshot rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn load_graph(&self, topic: TopicId) -> Result<GraphSnapshot>;
}

/// Produces a roadmap document for a topic name.
pub trait RoadmapGenerator {
    /// # Errors
    ///
    /// Returns an error if no document could be produced.
    fn generate(&self, topic: &str) -> Result<RoadmapDocument>;
}

/// Stores accepted roadmaps.
pub trait RoadmapSink {
    /// Save `document` as a new topic and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn save(&mut self, document: &RoadmapDocument) -> Result<TopicId>;
}

impl<T: GraphSource + ?Sized> GraphSource for &T {
    fn load_graph(&self, topic: TopicId) -> Result<GraphSnapshot> {
        (**self).load_graph(topic)
    }
}

impl<T: RoadmapSink + ?Sized> RoadmapSink for &mut T {
    fn save(&mut self, document: &RoadmapDocument) -> Result<TopicId> {
        (**self).save(document)
    }
}

// ---------------------------------------------------------------------------
// MemoryCatalog
// ---------------------------------------------------------------------------

/// Listing entry for one stored topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSummary {
    pub id: TopicId,
    pub name: String,
    pub description: String,
    pub concept_count: usize,
}

#[derive(Debug, Clone)]
struct StoredTopic {
    id: TopicId,
    name: String,
    description: String,
    snapshot: GraphSnapshot,
}

/// In-memory topic catalog.
///
/// Saved documents get catalog-wide concept ids, so two topics never share
/// an id even when their documents both number concepts from 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    topics: Vec<StoredTopic>,
    last_concept_id: ConceptId,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a snapshot as-is, keeping its ids. Returns the new topic id.
    pub fn insert_snapshot(
        &mut self,
        name: impl Into<String>,
        snapshot: GraphSnapshot,
    ) -> TopicId {
        let id = self.next_topic_id();
        if let Some(max_id) = snapshot.concepts.iter().map(|(id, _)| *id).max() {
            self.last_concept_id = self.last_concept_id.max(max_id);
        }
        self.topics.push(StoredTopic {
            id,
            name: name.into(),
            description: String::new(),
            snapshot,
        });
        id
    }

    /// List stored topics, newest first.
    #[must_use]
    pub fn topics(&self) -> Vec<TopicSummary> {
        self.topics
            .iter()
            .rev()
            .map(|topic| TopicSummary {
                id: topic.id,
                name: topic.name.clone(),
                description: topic.description.clone(),
                concept_count: topic.snapshot.concepts.len(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    fn next_topic_id(&self) -> TopicId {
        self.topics.last().map_or(1, |topic| topic.id + 1)
    }
}

impl GraphSource for MemoryCatalog {
    fn load_graph(&self, topic: TopicId) -> Result<GraphSnapshot> {
        Ok(self
            .topics
            .iter()
            .find(|stored| stored.id == topic)
            .map(|stored| stored.snapshot.clone())
            .unwrap_or_default())
    }
}

impl RoadmapSink for MemoryCatalog {
    fn save(&mut self, document: &RoadmapDocument) -> Result<TopicId> {
        let mut id_map: HashMap<ConceptId, ConceptId> =
            HashMap::with_capacity(document.concepts.len());
        let mut concepts = Vec::with_capacity(document.concepts.len());

        for concept in &document.concepts {
            self.last_concept_id += 1;
            id_map.insert(concept.id, self.last_concept_id);
            concepts.push((self.last_concept_id, concept.name.clone()));
        }

        let lookup = |local: ConceptId| id_map.get(&local).copied();

        let edges: Vec<(ConceptId, ConceptId)> = document
            .dependencies
            .iter()
            .filter_map(|dep| Some((lookup(dep.from)?, lookup(dep.to)?)))
            .collect();

        let id = self.next_topic_id();
        debug!(
            topic = id,
            concepts = concepts.len(),
            edges = edges.len(),
            "saved roadmap to memory catalog"
        );

        self.topics.push(StoredTopic {
            id,
            name: document.topic.clone(),
            description: document.description.clone(),
            snapshot: GraphSnapshot { concepts, edges },
        });

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConceptSpec, DependencySpec};

    fn document(
        topic: &str,
        ids: &[ConceptId],
        deps: &[(ConceptId, ConceptId)],
    ) -> RoadmapDocument {
        RoadmapDocument {
            topic: topic.to_string(),
            description: format!("{topic} roadmap"),
            concepts: ids
                .iter()
                .map(|&id| ConceptSpec {
                    id,
                    name: format!("{topic}-{id}"),
                    description: String::new(),
                    difficulty: 1,
                })
                .collect(),
            dependencies: deps
                .iter()
                .map(|&(from, to)| DependencySpec { from, to })
                .collect(),
        }
    }

    #[test]
    fn unknown_topic_loads_empty() {
        let catalog = MemoryCatalog::new();
        let snapshot = catalog.load_graph(7).expect("load");
        assert!(snapshot.is_empty());
    }

    #[test]
    fn save_remaps_ids_per_topic() {
        let mut catalog = MemoryCatalog::new();
        let first = catalog.save(&document("a", &[1, 2], &[(1, 2)])).expect("save");
        let second = catalog.save(&document("b", &[1, 2], &[(1, 2)])).expect("save");
        assert_ne!(first, second);

        let a = catalog.load_graph(first).expect("load a");
        let b = catalog.load_graph(second).expect("load b");
        assert_eq!(a.concepts, vec![(1, "a-1".to_string()), (2, "a-2".to_string())]);
        assert_eq!(a.edges, vec![(1, 2)]);
        assert_eq!(b.concepts, vec![(3, "b-1".to_string()), (4, "b-2".to_string())]);
        assert_eq!(b.edges, vec![(3, 4)]);
    }

    #[test]
    fn save_drops_unmapped_dependencies() {
        let mut catalog = MemoryCatalog::new();
        let topic = catalog
            .save(&document("a", &[10, 20], &[(10, 20), (10, 99), (98, 20)]))
            .expect("save");
        let snapshot = catalog.load_graph(topic).expect("load");
        assert_eq!(snapshot.edges.len(), 1);
    }

    #[test]
    fn topics_are_listed_newest_first() {
        let mut catalog = MemoryCatalog::new();
        catalog.save(&document("old", &[1], &[])).expect("save");
        catalog.save(&document("new", &[1, 2], &[])).expect("save");

        let listed = catalog.topics();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "new");
        assert_eq!(listed[0].concept_count, 2);
        assert_eq!(listed[1].name, "old");
        assert_eq!(listed[1].description, "old roadmap");
    }

    #[test]
    fn inserted_snapshot_keeps_ids_and_reserves_them() {
        let mut catalog = MemoryCatalog::new();
        let fixed = catalog.insert_snapshot(
            "fixed",
            GraphSnapshot {
                concepts: vec![(40, "x".to_string())],
                edges: Vec::new(),
            },
        );
        let saved = catalog.save(&document("next", &[1], &[])).expect("save");

        assert_eq!(catalog.load_graph(fixed).expect("load").concepts[0].0, 40);
        assert_eq!(catalog.load_graph(saved).expect("load").concepts[0].0, 41);
    }
}
