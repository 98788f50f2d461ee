//! Test-only helpers for constructing trace events and input fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::core::types::Event;

/// Create an event with an explicit payload.
pub fn event(agent: &str, event: &str, data: Value) -> Event {
    Event {
        agent: Some(agent.to_string()),
        event: Some(event.to_string()),
        data,
    }
}

pub fn completion(agent: &str, content_head: &str) -> Event {
    event(
        agent,
        "completion_received",
        json!({ "content_head": content_head }),
    )
}

pub fn final_extracted(agent: &str, answer: &str) -> Event {
    event(agent, "final_extracted", json!({ "final_answer": answer }))
}

pub fn verdict(verdict: &str) -> Event {
    event("checker", "verdict", json!({ "verdict": verdict }))
}

pub fn decision(chosen: &str) -> Event {
    event("arbiter", "decision", json!({ "chosen": chosen }))
}

pub fn run_end() -> Event {
    event("system", "run_end", json!({}))
}

/// A solver completion followed by its extracted final answer.
pub fn solver_turn(content_head: &str, answer: &str) -> Vec<Event> {
    vec![
        completion("solver", content_head),
        final_extracted("solver", answer),
    ]
}

/// Serialize events as a line-delimited trace log.
pub fn trace_lines(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event).expect("event json"));
        out.push('\n');
    }
    out
}

/// Temporary directory holding the three required input files and traces.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.path(name);
        write_file(&path, &serde_json::to_string_pretty(value).expect("json"));
        path
    }

    pub fn write_trace(&self, name: &str, events: &[Event]) -> PathBuf {
        let path = self.path(name);
        write_file(&path, &trace_lines(events));
        path
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, contents).expect("write fixture");
}
