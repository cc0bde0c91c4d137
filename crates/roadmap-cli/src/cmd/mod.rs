pub mod path;
pub mod progress;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use roadmap_core::source::MemoryCatalog;
use roadmap_core::{RoadmapDocument, TopicId};
use tracing::debug;

/// The roadmap document argument shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct FileArg {
    /// Roadmap document (JSON, optionally wrapped in a markdown code fence).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Read and parse a roadmap document from disk.
pub fn load_document(path: &Path) -> anyhow::Result<RoadmapDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = RoadmapDocument::parse(&text)?;
    debug!(
        path = %path.display(),
        concepts = document.concepts.len(),
        dependencies = document.dependencies.len(),
        "loaded roadmap document"
    );
    Ok(document)
}

/// A roadmap document loaded into a single-topic catalog, ids unchanged.
pub struct OpenRoadmap {
    pub document: RoadmapDocument,
    pub catalog: MemoryCatalog,
    pub topic: TopicId,
}

/// Load `path` into an [`OpenRoadmap`] so planner queries can run on it.
pub fn open_roadmap(path: &Path) -> anyhow::Result<OpenRoadmap> {
    let document = load_document(path)?;
    let mut catalog = MemoryCatalog::new();
    let topic = catalog.insert_snapshot(document.topic.clone(), document.snapshot());
    Ok(OpenRoadmap {
        document,
        catalog,
        topic,
    })
}
