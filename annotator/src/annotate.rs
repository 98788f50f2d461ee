//! Batch annotation: joins the input indexes and classifies every problem.
//!
//! Each problem is independent: its trace is read, reduced to signals,
//! classified, and dropped. Nothing computed for one problem is visible to
//! another.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::core::classifier::{ClassifierInput, classify};
use crate::core::signals::TraceSignals;
use crate::core::text::head;
use crate::core::types::{Annotation, DatasetRecord, EvaluationResult, Event, PredictionRecord};
use crate::io::config::AnnotatorConfig;
use crate::io::inputs::Inputs;
use crate::io::trace_log::load_trace;

/// Characters of the question kept in `Annotation::task`.
pub const TASK_PREVIEW_CHARS: usize = 200;

/// Why a problem produced no annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingDataset,
    MissingPrediction,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::MissingDataset => "missing dataset entry",
            SkipReason::MissingPrediction => "missing prediction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus<'a> {
    Annotated { summary: &'a str },
    Skipped(SkipReason),
}

/// Per-problem progress notification, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<'a> {
    pub index: usize,
    pub total: usize,
    pub problem_id: &'a str,
    pub status: ProgressStatus<'a>,
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRun {
    pub annotations: Vec<Annotation>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Build the annotation for one problem from its already-loaded trace.
pub fn annotate_problem(
    problem: &DatasetRecord,
    result: &EvaluationResult,
    trace_file: &str,
    trace: &[Event],
) -> Annotation {
    let signals = TraceSignals::extract(trace);
    let analysis = classify(ClassifierInput {
        signals: &signals,
        success: result.correct,
        predicted: &result.predicted,
        ground_truth: &result.ground_truth,
    });
    Annotation {
        problem_id: result.id.clone(),
        task: format!("{}...", head(&problem.question, TASK_PREVIEW_CHARS)),
        trace_file: trace_file.to_string(),
        num_agents: analysis.num_agents,
        agent_sequence: analysis.agent_sequence,
        success: result.correct,
        predicted_answer: result.predicted.clone(),
        ground_truth: result.ground_truth.clone(),
        identified_failure_modes: analysis.failure_modes,
        summary: analysis.summary,
    }
}

/// Annotate every evaluated problem that has both a dataset entry and a
/// prediction. Problems missing from either index are skipped.
///
/// Evaluation details are processed in file order; a repeated problem id is
/// processed once, at its first position, using its last record.
#[instrument(skip_all, fields(details = inputs.evaluation.details.len()))]
pub fn annotate_all<F>(inputs: &Inputs, cfg: &AnnotatorConfig, mut on_progress: F) -> AnnotationRun
where
    F: FnMut(&Progress<'_>),
{
    let dataset: HashMap<&str, &DatasetRecord> = inputs
        .dataset
        .iter()
        .map(|record| (record.id.as_str(), record))
        .collect();
    let predictions: HashMap<&str, &PredictionRecord> = inputs
        .predictions
        .iter()
        .map(|record| (record.id.as_str(), record))
        .collect();

    let latest: HashMap<&str, &EvaluationResult> = inputs
        .evaluation
        .details
        .iter()
        .map(|result| (result.id.as_str(), result))
        .collect();

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for result in &inputs.evaluation.details {
        let id = result.id.as_str();
        if seen.insert(id) {
            order.push(id);
        } else {
            warn!(problem_id = id, "duplicate evaluation entry, later record wins");
        }
    }

    let total = order.len();
    let mut run = AnnotationRun::default();
    for (offset, id) in order.into_iter().enumerate() {
        let index = offset + 1;
        let result = latest[id];
        let joined = match (dataset.get(id), predictions.get(id)) {
            (None, _) => Err(SkipReason::MissingDataset),
            (_, None) => Err(SkipReason::MissingPrediction),
            (Some(problem), Some(prediction)) => Ok((*problem, *prediction)),
        };
        let (problem, prediction) = match joined {
            Ok(pair) => pair,
            Err(reason) => {
                warn!(problem_id = id, reason = reason.label(), "problem skipped");
                on_progress(&Progress {
                    index,
                    total,
                    problem_id: id,
                    status: ProgressStatus::Skipped(reason),
                });
                run.skipped.push((id.to_string(), reason));
                continue;
            }
        };

        let trace = if prediction.trace_file.is_empty() {
            Vec::new()
        } else {
            load_trace(&cfg.trace_path(&prediction.trace_file))
        };
        debug!(problem_id = id, events = trace.len(), "trace loaded");

        let annotation = annotate_problem(problem, result, &prediction.trace_file, &trace);
        on_progress(&Progress {
            index,
            total,
            problem_id: id,
            status: ProgressStatus::Annotated {
                summary: &annotation.summary,
            },
        });
        run.annotations.push(annotation);
    }

    info!(
        annotated = run.annotations.len(),
        skipped = run.skipped.len(),
        "annotation finished"
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::FailureCode;
    use crate::core::types::EvaluationReport;
    use crate::test_support::{Fixture, completion, run_end, solver_turn, verdict};
    use std::path::Path;

    const LONG: &str = "A sufficiently long solver completion for the problem";

    fn problem(id: &str, question: &str) -> DatasetRecord {
        DatasetRecord {
            id: id.to_string(),
            question: question.to_string(),
        }
    }

    fn result(id: &str, correct: bool, predicted: &str, truth: &str) -> EvaluationResult {
        EvaluationResult {
            id: id.to_string(),
            correct,
            predicted: predicted.to_string(),
            ground_truth: vec![truth.to_string()],
        }
    }

    fn prediction(id: &str, trace_file: &str) -> PredictionRecord {
        PredictionRecord {
            id: id.to_string(),
            trace_file: trace_file.to_string(),
        }
    }

    fn config(root: &Path) -> AnnotatorConfig {
        AnnotatorConfig {
            traces_root: root.to_path_buf(),
            ..AnnotatorConfig::default()
        }
    }

    #[test]
    fn task_is_truncated_question() {
        let question = "q".repeat(250);
        let annotation = annotate_problem(
            &problem("p", &question),
            &result("p", false, "", "1"),
            "",
            &[],
        );
        assert_eq!(annotation.task.len(), TASK_PREVIEW_CHARS + 3);
        assert!(annotation.task.ends_with("..."));
    }

    #[test]
    fn skips_problems_missing_from_either_index() {
        let fixture = Fixture::new();
        let mut trace = solver_turn(LONG, "4");
        trace.push(verdict("ACCEPT"));
        trace.push(run_end());
        fixture.write_trace("traces/a.jsonl", &trace);

        let inputs = Inputs {
            dataset: vec![problem("a", "2+2?"), problem("c", "?")],
            evaluation: EvaluationReport {
                total: 3,
                correct: 1,
                accuracy: 1.0 / 3.0,
                details: vec![
                    result("a", true, "4", "4"),
                    result("b", false, "1", "2"),
                    result("c", false, "1", "2"),
                ],
            },
            predictions: vec![prediction("a", "traces/a.jsonl"), prediction("b", "x")],
        };

        let mut lines = Vec::new();
        let run = annotate_all(&inputs, &config(fixture.dir.path()), |progress| {
            let skipped = matches!(progress.status, ProgressStatus::Skipped(_));
            lines.push((progress.index, progress.total, skipped));
        });

        assert_eq!(run.annotations.len(), 1);
        assert_eq!(run.annotations[0].problem_id, "a");
        assert!(run.annotations[0].identified_failure_modes.is_empty());
        assert_eq!(
            run.skipped,
            vec![
                ("b".to_string(), SkipReason::MissingDataset),
                ("c".to_string(), SkipReason::MissingPrediction),
            ]
        );
        assert_eq!(lines, vec![(1, 3, false), (2, 3, true), (3, 3, true)]);
    }

    #[test]
    fn missing_trace_file_is_analyzed_as_empty() {
        let fixture = Fixture::new();
        let inputs = Inputs {
            dataset: vec![problem("a", "q")],
            evaluation: EvaluationReport {
                details: vec![result("a", false, "", "4")],
                ..EvaluationReport::default()
            },
            predictions: vec![prediction("a", "traces/absent.jsonl")],
        };
        let run = annotate_all(&inputs, &config(fixture.dir.path()), |_| {});
        let modes = &run.annotations[0].identified_failure_modes;
        assert!(modes.contains_key(&FailureCode::PrematureTermination));
        assert!(modes.contains_key(&FailureCode::SolverFailure));
        assert_eq!(run.annotations[0].trace_file, "traces/absent.jsonl");
    }

    #[test]
    fn duplicate_evaluation_ids_keep_position_and_take_last_record() {
        let fixture = Fixture::new();
        fixture.write_trace("t.jsonl", &[completion("solver", LONG), run_end()]);
        let inputs = Inputs {
            dataset: vec![problem("a", "q")],
            evaluation: EvaluationReport {
                details: vec![
                    result("a", true, "x", "x"),
                    result("b", false, "1", "2"),
                    result("a", false, "y", "x"),
                ],
                ..EvaluationReport::default()
            },
            predictions: vec![prediction("a", "t.jsonl")],
        };
        let mut order = Vec::new();
        let run = annotate_all(&inputs, &config(fixture.dir.path()), |progress| {
            order.push((progress.problem_id.to_string(), progress.total));
        });
        assert_eq!(order, vec![("a".to_string(), 2), ("b".to_string(), 2)]);
        assert_eq!(run.annotations.len(), 1);
        assert!(!run.annotations[0].success);
        assert_eq!(run.annotations[0].predicted_answer, "y");
    }
}
