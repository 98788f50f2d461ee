//! Shared record types for trace classification.
//!
//! Input records mirror the files produced by the external solving pipeline
//! and are parsed leniently: problem ids may be strings or numbers, and
//! ground truth may be a single string or a list.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::taxonomy::FailureCode;

/// One line of a trace log.
///
/// Ordering within a trace is the only timing information relied upon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Event {
    /// True when this event was emitted by `agent` with type `event`.
    pub fn is(&self, agent: &str, event: &str) -> bool {
        self.agent.as_deref() == Some(agent) && self.event.as_deref() == Some(event)
    }

    /// Read a payload field as text.
    ///
    /// Strings are returned as-is, numbers in their JSON form. Anything else
    /// (including a missing field or a non-object payload) reads as empty.
    pub fn data_text(&self, key: &str) -> String {
        self.data.get(key).map(value_text).unwrap_or_default()
    }
}

/// One row of the problem dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetRecord {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub question: String,
}

/// Prediction index entry pointing at a problem's trace log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionRecord {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub trace_file: String,
}

/// Externally produced correctness verdict for one problem.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationResult {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(default)]
    pub correct: bool,
    #[serde(default, deserialize_with = "text")]
    pub predicted: String,
    #[serde(default, deserialize_with = "text_list")]
    pub ground_truth: Vec<String>,
}

/// Top-level evaluation results file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvaluationReport {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub details: Vec<EvaluationResult>,
}

/// A failure mode identified in one trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedFailure {
    pub name: String,
    pub definition: String,
    #[serde(rename = "example_from_trace", alias = "evidence")]
    pub evidence: String,
}

/// Per-problem diagnostic record. Created once, serialized, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub problem_id: String,
    #[serde(default)]
    pub task: String,
    pub trace_file: String,
    pub num_agents: usize,
    pub agent_sequence: Vec<String>,
    pub success: bool,
    pub predicted_answer: String,
    pub ground_truth: Vec<String>,
    pub identified_failure_modes: BTreeMap<FailureCode, IdentifiedFailure>,
    pub summary: String,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(_) | Value::Number(_) | Value::Null => Ok(value_text(&value)),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(_) | Value::Number(_) => value_text(item),
                other => other.to_string(),
            })
            .collect(),
        other => vec![value_text(&other)],
    })
}
