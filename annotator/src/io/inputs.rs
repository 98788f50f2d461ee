//! Readers for the dataset, evaluation results, and prediction index.
//!
//! All three files are required: a missing one aborts the run before any
//! output is written.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::core::types::{DatasetRecord, EvaluationReport, PredictionRecord};
use crate::io::config::AnnotatorConfig;

/// Materialized inputs for one annotation run.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub dataset: Vec<DatasetRecord>,
    pub evaluation: EvaluationReport,
    pub predictions: Vec<PredictionRecord>,
}

#[instrument(skip_all)]
pub fn load_inputs(cfg: &AnnotatorConfig) -> Result<Inputs> {
    let dataset: Vec<DatasetRecord> = load_required(&cfg.dataset, "dataset")?;
    let evaluation: EvaluationReport = load_required(&cfg.evaluation, "evaluation results")?;
    let predictions: Vec<PredictionRecord> = load_required(&cfg.predictions, "predictions")?;
    debug!(
        dataset = dataset.len(),
        details = evaluation.details.len(),
        predictions = predictions.len(),
        "inputs loaded"
    );
    Ok(Inputs {
        dataset,
        evaluation,
        predictions,
    })
}

/// Read and parse a required JSON file.
pub fn load_required<T: DeserializeOwned>(path: &Path, label: &str) -> Result<T> {
    if !path.exists() {
        bail!("missing {label}: {}", path.display());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {label} {}", path.display()))
}
