//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::annotate::{Progress, ProgressStatus, annotate_all};
use crate::core::classifier::{ClassifierInput, classify};
use crate::core::signals::TraceSignals;
use crate::core::taxonomy::CATALOG;
use crate::core::text::head;
use crate::io::annotations::{read_annotations, write_annotations};
use crate::io::config::{ConfigOverrides, apply_overrides, load_config};
use crate::io::inputs::load_inputs;
use crate::io::trace_log::load_trace;
use crate::report::{aggregate, render};

/// Characters of the summary shown on a progress line.
const PROGRESS_SUMMARY_CHARS: usize = 60;

/// Annotate every problem and write the annotation file.
pub fn annotate(config_path: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let cfg = apply_overrides(load_config(config_path)?, overrides).context("resolve config")?;
    debug!(?cfg, "config resolved");

    let inputs = load_inputs(&cfg)?;
    let evaluation = &inputs.evaluation;
    println!("annotate: dataset={} problems", inputs.dataset.len());
    println!(
        "annotate: evaluation={}/{} correct ({:.2}%)",
        evaluation.correct,
        evaluation.total,
        evaluation.accuracy * 100.0
    );
    println!("annotate: predictions={}", inputs.predictions.len());

    let run = annotate_all(&inputs, &cfg, |progress| {
        println!("{}", progress_line(progress));
    });

    write_annotations(&cfg.output, &run.annotations).context("write annotations")?;
    info!(output = %cfg.output.display(), "annotations saved");
    println!("annotate: saved {}", cfg.output.display());

    for line in render(&aggregate(&run.annotations)) {
        println!("{line}");
    }
    Ok(())
}

/// Classify a single trace and print the analysis as JSON.
pub fn classify_trace(
    trace_path: &Path,
    success: bool,
    predicted: &str,
    ground_truth: &[String],
) -> Result<()> {
    if !trace_path.exists() {
        warn!(path = %trace_path.display(), "trace missing, classifying as empty");
    }
    let trace = load_trace(trace_path);
    let signals = TraceSignals::extract(&trace);
    let analysis = classify(ClassifierInput {
        signals: &signals,
        success,
        predicted,
        ground_truth,
    });
    let json = serde_json::to_string_pretty(&analysis).context("serialize analysis")?;
    println!("{json}");
    Ok(())
}

/// Print aggregates for an existing annotation file.
pub fn report(annotations_path: &Path) -> Result<()> {
    let annotations = read_annotations(annotations_path).context("load annotations")?;
    println!("report: file={}", annotations_path.display());
    for line in render(&aggregate(&annotations)) {
        println!("{line}");
    }
    Ok(())
}

/// Print the fixed failure-mode catalog.
pub fn taxonomy() {
    for mode in &CATALOG {
        println!(
            "{} [{}] {}: {}",
            mode.code,
            mode.category.label(),
            mode.name,
            mode.definition
        );
    }
}

pub fn progress_line(progress: &Progress<'_>) -> String {
    let prefix = format!(
        "  [{}/{}] {}",
        progress.index, progress.total, progress.problem_id
    );
    match progress.status {
        ProgressStatus::Annotated { summary } => {
            format!("{prefix} - {}", head(summary, PROGRESS_SUMMARY_CHARS))
        }
        ProgressStatus::Skipped(reason) => format!("{prefix} - SKIPPED ({})", reason.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::SkipReason;

    #[test]
    fn progress_line_truncates_summary() {
        let summary = "x".repeat(80);
        let line = progress_line(&Progress {
            index: 2,
            total: 5,
            problem_id: "p-2",
            status: ProgressStatus::Annotated { summary: &summary },
        });
        assert_eq!(line, format!("  [2/5] p-2 - {}", "x".repeat(60)));
    }

    #[test]
    fn progress_line_reports_skip_reason() {
        let line = progress_line(&Progress {
            index: 1,
            total: 1,
            problem_id: "p",
            status: ProgressStatus::Skipped(SkipReason::MissingPrediction),
        });
        assert_eq!(line, "  [1/1] p - SKIPPED (missing prediction)");
    }
}
