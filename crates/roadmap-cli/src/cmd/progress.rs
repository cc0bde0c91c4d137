//! `roadmap frontier|unlocked|progress`: what a learner can study next.

use std::io::Write;

use clap::Args;
use roadmap_core::planner::{LearningPlanner, ProgressReport};
use roadmap_core::{ConceptId, ConceptRef};
use serde::Serialize;

use super::{FileArg, open_roadmap};
use crate::output::{
    OutputMode, pretty_concepts, pretty_kv, pretty_section, render_mode, text_concepts,
};

/// Arguments shared by the progress-aware subcommands.
#[derive(Args, Debug)]
pub struct MasteryArgs {
    #[command(flatten)]
    pub input: FileArg,

    /// Comma-separated ids of concepts already mastered.
    #[arg(long, short = 'm', value_delimiter = ',', value_name = "IDS")]
    pub mastered: Vec<ConceptId>,
}

/// Which single-list query to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Frontier,
    Unlocked,
}

impl Query {
    const fn heading(self) -> &'static str {
        match self {
            Self::Frontier => "One prerequisite away",
            Self::Unlocked => "Ready to learn",
        }
    }
}

#[derive(Debug, Serialize)]
struct ConceptListOutput {
    topic: String,
    mastered: Vec<ConceptId>,
    concepts: Vec<ConceptRef>,
}

#[derive(Debug, Serialize)]
struct ProgressOutput {
    topic: String,
    #[serde(flatten)]
    report: ProgressReport,
}

/// Execute `roadmap frontier` or `roadmap unlocked`.
pub fn run_query(args: &MasteryArgs, query: Query, output: OutputMode) -> anyhow::Result<()> {
    let open = open_roadmap(&args.input.file)?;
    let planner = LearningPlanner::new(&open.catalog);
    let concepts = match query {
        Query::Frontier => planner.frontier(open.topic, &args.mastered)?,
        Query::Unlocked => planner.unlocked(open.topic, &args.mastered)?,
    };

    let payload = ConceptListOutput {
        topic: open.document.topic,
        mastered: args.mastered.clone(),
        concepts,
    };
    render_mode(
        output,
        &payload,
        |p, w| text_concepts(w, &p.concepts),
        |p, w| {
            pretty_section(w, &format!("{}: {}", query.heading(), p.topic))?;
            pretty_concepts(w, &p.concepts)
        },
    )
}

/// Execute `roadmap progress`.
pub fn run_progress(args: &MasteryArgs, output: OutputMode) -> anyhow::Result<()> {
    let open = open_roadmap(&args.input.file)?;
    let report = LearningPlanner::new(&open.catalog).progress(open.topic, &args.mastered)?;

    let payload = ProgressOutput {
        topic: open.document.topic,
        report,
    };
    render_mode(output, &payload, render_progress_text, render_progress_pretty)
}

fn render_progress_text(payload: &ProgressOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let groups = [
        ("mastered", &payload.report.mastered),
        ("unlocked", &payload.report.unlocked),
        ("frontier", &payload.report.frontier),
    ];
    for (label, concepts) in groups {
        for concept in concepts {
            writeln!(w, "{label}\t{}\t{}", concept.id, concept.name)?;
        }
    }
    Ok(())
}

fn render_progress_pretty(payload: &ProgressOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;
    pretty_section(w, &format!("Progress: {}", payload.topic))?;
    pretty_kv(w, "Mastered", report.mastered.len().to_string())?;
    pretty_kv(w, "Unlocked", report.unlocked.len().to_string())?;
    pretty_kv(w, "Frontier", report.frontier.len().to_string())?;

    writeln!(w, "\n{}", Query::Unlocked.heading())?;
    pretty_concepts(w, &report.unlocked)?;
    writeln!(w, "\n{}", Query::Frontier.heading())?;
    pretty_concepts(w, &report.frontier)
}
