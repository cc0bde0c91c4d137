use std::fmt;

use crate::model::{ConceptId, TopicId};

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyTopic,
    ConfigParseError,
    DocumentReadFailed,
    MalformedDocument,
    TopicNotFound,
    CycleDetected,
    ConceptLimit,
    DuplicateConcept,
    InvalidDifficulty,
    DanglingDependency,
    GenerationFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyTopic => "E1001",
            Self::ConfigParseError => "E1002",
            Self::DocumentReadFailed => "E1003",
            Self::MalformedDocument => "E2001",
            Self::TopicNotFound => "E2002",
            Self::CycleDetected => "E2003",
            Self::ConceptLimit => "E2004",
            Self::DuplicateConcept => "E2005",
            Self::InvalidDifficulty => "E2006",
            Self::DanglingDependency => "E2007",
            Self::GenerationFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyTopic => "Topic cannot be empty",
            Self::ConfigParseError => "Config file parse error",
            Self::DocumentReadFailed => "Roadmap file could not be read",
            Self::MalformedDocument => "Malformed roadmap document",
            Self::TopicNotFound => "Topic not found",
            Self::CycleDetected => "Roadmap contains a prerequisite cycle",
            Self::ConceptLimit => "Concept count out of range",
            Self::DuplicateConcept => "Duplicate concept id",
            Self::InvalidDifficulty => "Difficulty out of range",
            Self::DanglingDependency => "Dependency references an unknown concept",
            Self::GenerationFailed => "Roadmap generation failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyTopic => Some("Pass a non-blank topic name."),
            Self::ConfigParseError => Some("Fix syntax in .roadmap/config.toml and retry."),
            Self::DocumentReadFailed => Some("Check the file path and read permissions."),
            Self::MalformedDocument => {
                Some("Provide JSON with `topic`, `concepts` and `dependencies` fields.")
            }
            Self::TopicNotFound => None,
            Self::CycleDetected => {
                Some("Remove or reverse one dependency in each reported cycle, then retry.")
            }
            Self::ConceptLimit => Some("Adjust `ingest.min_concepts`/`ingest.max_concepts`."),
            Self::DuplicateConcept => Some("Give every concept a distinct id."),
            Self::InvalidDifficulty => Some("Use a difficulty from 1 (beginner) to 5 (advanced)."),
            Self::DanglingDependency => Some(
                "Fix the dependency ids or set `ingest.drop_dangling_edges = true`.",
            ),
            Self::GenerationFailed => Some("Retry generation; generated roadmaps vary per run."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Domain rejections raised by the planner and the ingestion pipeline.
///
/// The concept graph itself never fails; these errors come from the layers
/// that load roadmaps and decide whether to accept them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoadmapError {
    #[error("topic cannot be empty")]
    EmptyTopic,

    #[error("topic {topic} not found")]
    TopicNotFound { topic: TopicId },

    #[error("malformed roadmap document: {reason}")]
    MalformedDocument { reason: String },

    #[error("roadmap has {count} concepts, expected between {min} and {max}")]
    ConceptLimit { count: usize, min: usize, max: usize },

    #[error("concept id {id} appears more than once")]
    DuplicateConcept { id: ConceptId },

    #[error("concept {id} has difficulty {difficulty}, expected 1 to 5")]
    InvalidDifficulty { id: ConceptId, difficulty: u8 },

    #[error("dependency {from} -> {to} references an unknown concept")]
    DanglingDependency { from: ConceptId, to: ConceptId },

    #[error("roadmap contains {} prerequisite cycle(s): {}", .cycles.len(), format_cycles(.cycles))]
    CycleDetected { cycles: Vec<Vec<ConceptId>> },

    #[error("roadmap generation failed: {reason}")]
    GenerationFailed { reason: String },
}

impl RoadmapError {
    /// The stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyTopic => ErrorCode::EmptyTopic,
            Self::TopicNotFound { .. } => ErrorCode::TopicNotFound,
            Self::MalformedDocument { .. } => ErrorCode::MalformedDocument,
            Self::ConceptLimit { .. } => ErrorCode::ConceptLimit,
            Self::DuplicateConcept { .. } => ErrorCode::DuplicateConcept,
            Self::InvalidDifficulty { .. } => ErrorCode::InvalidDifficulty,
            Self::DanglingDependency { .. } => ErrorCode::DanglingDependency,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::GenerationFailed { .. } => ErrorCode::GenerationFailed,
        }
    }
}

fn format_cycles(cycles: &[Vec<ConceptId>]) -> String {
    cycles
        .iter()
        .map(|members| {
            let ids: Vec<String> = members.iter().map(ToString::to_string).collect();
            format!("[{}]", ids.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
