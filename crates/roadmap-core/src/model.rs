//! Data shapes exchanged with the graph's collaborators.
//!
//! - [`GraphSnapshot`] is what a data source hands the core: ordered
//!   `(id, name)` concepts and ordered prerequisite edges for one topic.
//! - [`ConceptRef`] is what the planner hands back after resolving ids.
//! - [`RoadmapDocument`] is the shape a roadmap generator produces and the
//!   CLI reads from disk.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RoadmapError;
use crate::graph::ConceptGraph;

/// Identifier of one concept. Unique within a roadmap.
pub type ConceptId = i64;

/// Identifier of one roadmap (topic) in a catalog.
pub type TopicId = i64;

/// A concept id resolved to its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRef {
    pub id: ConceptId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// GraphSnapshot
// ---------------------------------------------------------------------------

/// Raw concepts and edges for one roadmap, as loaded by a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    /// `(id, name)` pairs in load order.
    pub concepts: Vec<(ConceptId, String)>,
    /// `(prerequisite, dependent)` pairs in load order.
    pub edges: Vec<(ConceptId, ConceptId)>,
}

impl GraphSnapshot {
    /// Return `true` if the snapshot holds no concepts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Build a fresh [`ConceptGraph`] over this snapshot.
    #[must_use]
    pub fn graph(&self) -> ConceptGraph {
        ConceptGraph::build(
            self.concepts.iter().map(|(id, name)| (*id, name.as_str())),
            self.edges.iter().copied(),
        )
    }

    /// Resolve ids to [`ConceptRef`]s, keeping order and skipping ids that
    /// are not in the snapshot.
    #[must_use]
    pub fn resolve(&self, ids: &[ConceptId]) -> Vec<ConceptRef> {
        let names: HashMap<ConceptId, &str> = self
            .concepts
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();

        ids.iter()
            .filter_map(|id| {
                names.get(id).map(|name| ConceptRef {
                    id: *id,
                    name: (*name).to_string(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// RoadmapDocument
// ---------------------------------------------------------------------------

/// A generated roadmap: topic metadata plus concepts and dependencies with
/// document-local ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapDocument {
    pub topic: String,
    #[serde(default)]
    pub description: String,
    pub concepts: Vec<ConceptSpec>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

/// One concept in a [`RoadmapDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSpec {
    pub id: ConceptId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 1 (beginner) to 5 (advanced).
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

/// One prerequisite relation in a [`RoadmapDocument`]: `from` must be
/// mastered before `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub from: ConceptId,
    pub to: ConceptId,
}

const fn default_difficulty() -> u8 {
    1
}

impl RoadmapDocument {
    /// Parse a document from JSON text.
    ///
    /// Generators often wrap their answer in a markdown code fence
    /// (optionally tagged `json`); the fence is stripped before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::MalformedDocument`] if the text is not a valid
    /// document.
    pub fn parse(text: &str) -> Result<Self, RoadmapError> {
        serde_json::from_str(strip_code_fence(text)).map_err(|err| {
            RoadmapError::MalformedDocument {
                reason: err.to_string(),
            }
        })
    }

    /// The concepts and edges of this document as a [`GraphSnapshot`].
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            concepts: self
                .concepts
                .iter()
                .map(|c| (c.id, c.name.clone()))
                .collect(),
            edges: self.dependencies.iter().map(|d| (d.from, d.to)).collect(),
        }
    }
}

/// Return the body of a leading markdown code fence, or the trimmed input.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split("```").next().unwrap_or_default();
    body.strip_prefix("json").unwrap_or(body).trim()
}
