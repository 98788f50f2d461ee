//! Loading line-delimited trace logs written by the solving pipeline.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::types::Event;

/// Load a trace log as an ordered event sequence.
///
/// A missing file is an empty trace (the pipeline never got far enough to
/// write one), not an error. An unreadable file is logged and also treated
/// as empty.
pub fn load_trace(path: &Path) -> Vec<Event> {
    if !path.exists() {
        debug!(path = %path.display(), "trace missing");
        return Vec::new();
    }
    match fs::read(path) {
        Ok(bytes) => parse_trace(&String::from_utf8_lossy(&bytes)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "trace unreadable");
            Vec::new()
        }
    }
}

/// Parse each non-blank line as one event. Malformed lines are skipped.
pub fn parse_trace(contents: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut skipped = 0usize;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(line) {
            Ok(event) => events.push(event),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, parsed = events.len(), "skipped malformed trace lines");
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, completion, run_end, trace_lines};

    #[test]
    fn missing_file_is_empty_trace() {
        let fixture = Fixture::new();
        assert!(load_trace(&fixture.path("absent.jsonl")).is_empty());
    }

    #[test]
    fn corrupt_lines_do_not_abort_parsing() {
        let good = trace_lines(&[completion("solver", "hello"), run_end()]);
        let mut lines = good.lines();
        let contents = format!(
            "{}\n{{not json\n\n   \n42\n{}\n",
            lines.next().expect("first"),
            lines.next().expect("second")
        );
        let events = parse_trace(&contents);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].agent.as_deref(), Some("solver"));
        assert_eq!(events[1].event.as_deref(), Some("run_end"));
    }

    #[test]
    fn loads_events_in_file_order() {
        let fixture = Fixture::new();
        let path = fixture.write_trace(
            "traces/p1.jsonl",
            &[completion("solver", "a"), completion("checker", "b")],
        );
        let agents: Vec<String> = load_trace(&path)
            .into_iter()
            .filter_map(|event| event.agent)
            .collect();
        assert_eq!(agents, vec!["solver", "checker"]);
    }
}
