//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for agents, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output.format` in `.roadmap/config.toml`
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use roadmap_core::{ConceptRef, ErrorCode, RoadmapError};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// Numbered concept list for pretty output.
pub fn pretty_concepts(w: &mut dyn Write, concepts: &[ConceptRef]) -> io::Result<()> {
    if concepts.is_empty() {
        return writeln!(w, "  (none)");
    }
    for (position, concept) in concepts.iter().enumerate() {
        writeln!(w, "{:>4}. {} (#{})", position + 1, concept.name, concept.id)?;
    }
    Ok(())
}

/// One `id<TAB>name` row per concept for text output.
pub fn text_concepts(w: &mut dyn Write, concepts: &[ConceptRef]) -> io::Result<()> {
    for concept in concepts {
        writeln!(w, "{}\t{}", concept.id, concept.name)?;
    }
    Ok(())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, numbered lists).
    Pretty,
    /// Token-efficient plain text for agents and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn parse_name(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
///
/// Unknown `FORMAT` or config values fall through to the next source.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(mode) = format_env.and_then(OutputMode::parse_name) {
        return mode;
    }

    if let Some(mode) = config_format.and_then(OutputMode::parse_name) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config and TTY defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_format: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_format,
        is_tty,
    )
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_mode(&mut out, mode, value, text_fn, pretty_fn)
}

/// [`render_mode`] against an arbitrary writer.
pub fn write_mode<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2003").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create an error carrying `code` and its hint.
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }

    /// Classify an error from a command handler.
    ///
    /// Domain rejections keep their own code; I/O failures anywhere in the
    /// chain become [`ErrorCode::DocumentReadFailed`].
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(domain) = err.downcast_ref::<RoadmapError>() {
            return Self::from(domain);
        }
        let code = if err.chain().any(|cause| cause.is::<io::Error>()) {
            ErrorCode::DocumentReadFailed
        } else {
            ErrorCode::InternalUnexpected
        };
        Self::from_code(code, format!("{err:#}"))
    }
}

impl From<&RoadmapError> for CliError {
    fn from(err: &RoadmapError) -> Self {
        Self::from_code(err.code(), err.to_string())
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(buf: Vec<u8>) -> String {
        String::from_utf8(buf).expect("utf8")
    }

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_config_used_when_env_unknown() {
        let mode = resolve_output_mode_inner(None, false, Some("fancy"), Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_falls_back_to_tty_detection() {
        let tty = resolve_output_mode_inner(None, false, None, Some("fancy"), true);
        assert_eq!(tty, OutputMode::Pretty);
        let pipe = resolve_output_mode_inner(None, false, None, None, false);
        assert_eq!(pipe, OutputMode::Text);
    }

    // ── rendering ───────────────────────────────────────────────────────────

    fn concepts() -> Vec<ConceptRef> {
        vec![
            ConceptRef {
                id: 1,
                name: "Arrays".to_string(),
            },
            ConceptRef {
                id: 2,
                name: "Linked Lists".to_string(),
            },
        ]
    }

    #[test]
    fn text_concepts_are_tab_separated() {
        let mut buf = Vec::new();
        text_concepts(&mut buf, &concepts()).expect("render");
        assert_eq!(utf8(buf), "1\tArrays\n2\tLinked Lists\n");
    }

    #[test]
    fn pretty_concepts_are_numbered() {
        let mut buf = Vec::new();
        pretty_concepts(&mut buf, &concepts()).expect("render");
        let rendered = utf8(buf);
        assert!(rendered.contains("   1. Arrays (#1)"));
        assert!(rendered.contains("   2. Linked Lists (#2)"));

        let mut empty = Vec::new();
        pretty_concepts(&mut empty, &[]).expect("render");
        assert!(utf8(empty).contains("(none)"));
    }

    #[test]
    fn write_mode_json_serializes_value() {
        let mut buf = Vec::new();
        write_mode(&mut buf, OutputMode::Json, &concepts(), |_, _| Ok(()), |_, _| Ok(()))
            .expect("render");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(parsed[1]["name"], "Linked Lists");
    }

    #[test]
    fn write_mode_dispatches_text_and_pretty() {
        let mut text = Vec::new();
        write_mode(
            &mut text,
            OutputMode::Text,
            &1,
            |v, w| writeln!(w, "text {v}"),
            |v, w| writeln!(w, "pretty {v}"),
        )
        .expect("render");
        assert_eq!(utf8(text), "text 1\n");

        let mut pretty = Vec::new();
        write_mode(
            &mut pretty,
            OutputMode::Pretty,
            &1,
            |v, w| writeln!(w, "text {v}"),
            |v, w| writeln!(w, "pretty {v}"),
        )
        .expect("render");
        assert_eq!(utf8(pretty), "pretty 1\n");
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_from_roadmap_error() {
        let err = RoadmapError::CycleDetected {
            cycles: vec![vec![1, 2]],
        };
        let cli_err = CliError::from(&err);
        assert!(cli_err.message.contains("[1, 2]"));
        assert_eq!(cli_err.error_code.as_deref(), Some("E2003"));
        assert!(cli_err.suggestion.is_some());
    }

    #[test]
    fn classify_domain_error_through_context() {
        let err = anyhow::Error::from(RoadmapError::EmptyTopic).context("while validating");
        let cli_err = CliError::from_anyhow(&err);
        assert_eq!(cli_err.error_code.as_deref(), Some("E1001"));
    }

    #[test]
    fn classify_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = anyhow::Error::from(io_err).context("Failed to read roadmap.json");
        let cli_err = CliError::from_anyhow(&err);
        assert_eq!(cli_err.error_code.as_deref(), Some("E1003"));
        assert!(cli_err.message.contains("roadmap.json"));
    }

    #[test]
    fn classify_other_error_is_internal() {
        let err = anyhow::anyhow!("boom");
        let cli_err = CliError::from_anyhow(&err);
        assert_eq!(cli_err.error_code.as_deref(), Some("E9001"));
    }

    #[test]
    fn error_text_includes_code_and_hint() {
        let mut buf = Vec::new();
        let err = CliError::from_code(ErrorCode::DuplicateConcept, "concept id 4 appears twice");
        write_error(&mut buf, OutputMode::Text, &err).expect("render");
        let rendered = utf8(buf);
        assert!(rendered.starts_with("error[E2005]: concept id 4 appears twice"));
        assert!(rendered.contains("suggestion: Give every concept a distinct id."));
    }

    #[test]
    fn error_json_is_wrapped() {
        let mut buf = Vec::new();
        let err = CliError::from_code(ErrorCode::TopicNotFound, "topic 3 not found");
        write_error(&mut buf, OutputMode::Json, &err).expect("render");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(parsed["error"]["error_code"], "E2002");
        assert!(parsed["error"].get("suggestion").is_none());
    }
}
