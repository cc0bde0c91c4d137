//! `roadmap path` and `roadmap layers`: study order for a roadmap.

use std::io::Write;

use clap::Args;
use roadmap_core::ConceptRef;
use roadmap_core::planner::LearningPlanner;
use serde::Serialize;
use tracing::warn;

use super::{FileArg, load_document, open_roadmap};
use crate::output::{OutputMode, pretty_concepts, pretty_section, render_mode, text_concepts};

/// Arguments for `roadmap path`.
#[derive(Args, Debug)]
pub struct PathArgs {
    #[command(flatten)]
    pub input: FileArg,
}

/// Arguments for `roadmap layers`.
#[derive(Args, Debug)]
pub struct LayersArgs {
    #[command(flatten)]
    pub input: FileArg,
}

#[derive(Debug, Serialize)]
struct PathOutput {
    topic: String,
    /// `false` when a cycle kept some concepts out of the path.
    complete: bool,
    omitted: usize,
    path: Vec<ConceptRef>,
}

#[derive(Debug, Serialize)]
struct LayersOutput {
    topic: String,
    layers: Vec<Vec<ConceptRef>>,
}

/// Execute `roadmap path`.
pub fn run_path(args: &PathArgs, output: OutputMode) -> anyhow::Result<()> {
    let open = open_roadmap(&args.input.file)?;
    let planner = LearningPlanner::new(&open.catalog);
    let path = planner.learning_path(open.topic)?;

    let concept_count = open.document.snapshot().graph().len();
    let omitted = concept_count.saturating_sub(path.len());
    if omitted > 0 {
        warn!(
            omitted,
            "learning path is partial; run `roadmap validate` for cycles or unknown prerequisites"
        );
    }

    let payload = PathOutput {
        topic: open.document.topic,
        complete: omitted == 0,
        omitted,
        path,
    };
    render_mode(
        output,
        &payload,
        |p, w| text_concepts(w, &p.path),
        render_path_pretty,
    )
}

fn render_path_pretty(payload: &PathOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Learning path: {}", payload.topic))?;
    pretty_concepts(w, &payload.path)?;
    if !payload.complete {
        writeln!(
            w,
            "\n{} concept(s) omitted: behind a prerequisite cycle or an unknown prerequisite.",
            payload.omitted
        )?;
    }
    Ok(())
}

/// Execute `roadmap layers`.
pub fn run_layers(args: &LayersArgs, output: OutputMode) -> anyhow::Result<()> {
    let document = load_document(&args.input.file)?;
    let snapshot = document.snapshot();
    let layers = snapshot
        .graph()
        .learning_layers()
        .iter()
        .map(|layer| snapshot.resolve(layer))
        .collect();

    let payload = LayersOutput {
        topic: document.topic,
        layers,
    };
    render_mode(output, &payload, render_layers_text, render_layers_pretty)
}

fn render_layers_text(payload: &LayersOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for (depth, layer) in payload.layers.iter().enumerate() {
        let ids: Vec<String> = layer.iter().map(|c| c.id.to_string()).collect();
        writeln!(w, "{depth}\t{}", ids.join(","))?;
    }
    Ok(())
}

fn render_layers_pretty(payload: &LayersOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Learning layers: {}", payload.topic))?;
    for (depth, layer) in payload.layers.iter().enumerate() {
        writeln!(w, "Layer {}", depth + 1)?;
        for concept in layer {
            writeln!(w, "  - {} (#{})", concept.name, concept.id)?;
        }
    }
    Ok(())
}
