//! `roadmap validate <FILE>`: run the ingestion checks without saving.

use std::io::Write;

use clap::Args;
use roadmap_core::config::IngestConfig;
use roadmap_core::ingest::prepare_roadmap;
use serde::Serialize;

use super::{FileArg, load_document};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `roadmap validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: FileArg,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    topic: String,
    valid: bool,
    concept_count: usize,
    edge_count: usize,
    dropped_edges: usize,
    layer_count: usize,
}

/// Execute `roadmap validate`.
///
/// A rejected roadmap is returned as an error so the process exits non-zero.
pub fn run_validate(
    args: &ValidateArgs,
    config: &IngestConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let document = load_document(&args.input.file)?;
    let submitted_edges = document.dependencies.len();
    let accepted = prepare_roadmap(config, document)?;

    let graph = accepted.snapshot().graph();
    let payload = ValidateOutput {
        topic: accepted.topic.clone(),
        valid: graph.is_valid_dag(),
        concept_count: graph.len(),
        edge_count: accepted.dependencies.len(),
        dropped_edges: submitted_edges - accepted.dependencies.len(),
        layer_count: graph.learning_layers().len(),
    };

    render_mode(output, &payload, render_validate_text, render_validate_pretty)
}

fn render_validate_text(payload: &ValidateOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "ok  {}  concepts={} edges={} dropped={} layers={}",
        payload.topic,
        payload.concept_count,
        payload.edge_count,
        payload.dropped_edges,
        payload.layer_count
    )
}

fn render_validate_pretty(payload: &ValidateOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Roadmap: {}", payload.topic))?;
    pretty_kv(w, "Status", "valid (no prerequisite cycles)")?;
    pretty_kv(w, "Concepts", payload.concept_count.to_string())?;
    pretty_kv(w, "Edges", payload.edge_count.to_string())?;
    if payload.dropped_edges > 0 {
        pretty_kv(w, "Dropped", payload.dropped_edges.to_string())?;
    }
    pretty_kv(w, "Layers", payload.layer_count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(dropped_edges: usize) -> ValidateOutput {
        ValidateOutput {
            topic: "Graphs".to_string(),
            valid: true,
            concept_count: 4,
            edge_count: 3,
            dropped_edges,
            layer_count: 3,
        }
    }

    #[test]
    fn validate_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ValidateArgs,
        }

        let parsed = Wrapper::parse_from(["test", "roadmap.json"]);
        assert_eq!(parsed.args.input.file.to_str(), Some("roadmap.json"));
    }

    #[test]
    fn text_is_one_line() {
        let mut out = Vec::new();
        render_validate_text(&payload(1), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert_eq!(
            rendered,
            "ok  Graphs  concepts=4 edges=3 dropped=1 layers=3\n"
        );
    }

    #[test]
    fn pretty_hides_zero_dropped() {
        let mut out = Vec::new();
        render_validate_pretty(&payload(0), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("Roadmap: Graphs"));
        assert!(rendered.contains("Concepts:"));
        assert!(!rendered.contains("Dropped:"));
    }
}
