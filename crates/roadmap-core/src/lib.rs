#![forbid(unsafe_code)]
//! roadmap-core library.
//!
//! Prerequisite graphs over learning concepts, the progress queries built on
//! them, and the thin collaborators that feed them: a data-access seam, a
//! planner that resolves results to names, and an ingestion pipeline that
//! refuses cyclic roadmaps.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types; domain rejections are
//!   [`error::RoadmapError`] values carried inside the `anyhow::Error`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod model;
pub mod planner;
pub mod source;

pub use error::{ErrorCode, RoadmapError};
pub use graph::{ConceptGraph, Progress};
pub use model::{ConceptId, ConceptRef, GraphSnapshot, RoadmapDocument, TopicId};
