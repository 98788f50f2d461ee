//! Behavioral signals derived from a raw trace.
//!
//! Each derivation is an independent scan over the event sequence. Absence
//! of a matching event yields an empty or neutral value, never an error.
//!
//! Final answers are first-wins (the earliest `final_extracted` event is
//! authoritative) while checker verdicts and arbiter choices are last-wins
//! (a repeated invocation overrides the earlier one).

use std::collections::HashSet;

use crate::core::text::head;
use crate::core::types::Event;

pub const SOLVER: &str = "solver";
pub const CHECKER: &str = "checker";
pub const REFINER: &str = "refiner";
pub const ARBITER: &str = "arbiter";
pub const SYSTEM: &str = "system";

pub const FINAL_EXTRACTED: &str = "final_extracted";
pub const COMPLETION_RECEIVED: &str = "completion_received";
pub const VERDICT: &str = "verdict";
pub const DECISION: &str = "decision";
pub const RUN_END: &str = "run_end";

/// Characters of `content_head` used when no final answer was extracted.
const CONTENT_FALLBACK_CHARS: usize = 100;

/// Signals extracted from one trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSignals {
    /// Non-system agents in execution order, repetitions kept.
    pub agent_sequence: Vec<String>,
    pub solver_answer: String,
    pub refiner_answer: String,
    pub checker_verdict: String,
    pub arbiter_choice: String,
    /// Whether the pipeline emitted `run_end`.
    pub ended: bool,
    /// `content_head` of the first solver completion, if any.
    pub solver_content_head: Option<String>,
}

impl TraceSignals {
    pub fn extract(trace: &[Event]) -> Self {
        Self {
            agent_sequence: agent_sequence(trace),
            solver_answer: final_answer(trace, SOLVER),
            refiner_answer: final_answer(trace, REFINER),
            checker_verdict: checker_verdict(trace),
            arbiter_choice: arbiter_choice(trace),
            ended: has_run_end(trace),
            solver_content_head: completion_head(trace, SOLVER),
        }
    }

    /// Count of distinct agents in the sequence.
    pub fn num_agents(&self) -> usize {
        self.agent_sequence.iter().collect::<HashSet<_>>().len()
    }

    /// Index of the first occurrence of `agent` in the sequence.
    pub fn first_position(&self, agent: &str) -> Option<usize> {
        self.agent_sequence.iter().position(|name| name == agent)
    }

    pub fn ran(&self, agent: &str) -> bool {
        self.first_position(agent).is_some()
    }
}

pub fn agent_sequence(trace: &[Event]) -> Vec<String> {
    trace
        .iter()
        .filter_map(|event| event.agent.as_deref())
        .filter(|agent| !agent.is_empty() && *agent != SYSTEM)
        .map(str::to_string)
        .collect()
}

/// Final answer reported by `agent`.
///
/// The first `final_extracted` event wins even when its answer is empty.
/// Without one, falls back to a prefix of the first completion's content.
pub fn final_answer(trace: &[Event], agent: &str) -> String {
    if let Some(event) = trace.iter().find(|event| event.is(agent, FINAL_EXTRACTED)) {
        return event.data_text("final_answer");
    }
    completion_head(trace, agent)
        .map(|content| head(&content, CONTENT_FALLBACK_CHARS).to_string())
        .unwrap_or_default()
}

/// `content_head` of the first `completion_received` event from `agent`.
pub fn completion_head(trace: &[Event], agent: &str) -> Option<String> {
    trace
        .iter()
        .find(|event| event.is(agent, COMPLETION_RECEIVED))
        .map(|event| event.data_text("content_head"))
}

pub fn checker_verdict(trace: &[Event]) -> String {
    last_non_empty(trace, CHECKER, VERDICT, "verdict")
}

pub fn arbiter_choice(trace: &[Event]) -> String {
    last_non_empty(trace, ARBITER, DECISION, "chosen")
}

pub fn has_run_end(trace: &[Event]) -> bool {
    trace
        .iter()
        .any(|event| event.event.as_deref() == Some(RUN_END))
}

fn last_non_empty(trace: &[Event], agent: &str, event_type: &str, key: &str) -> String {
    trace
        .iter()
        .rev()
        .filter(|event| event.is(agent, event_type))
        .map(|event| event.data_text(key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{completion, decision, event, final_extracted, run_end, verdict};
    use serde_json::json;

    #[test]
    fn empty_trace_yields_neutral_signals() {
        let signals = TraceSignals::extract(&[]);
        assert_eq!(signals, TraceSignals::default());
        assert_eq!(signals.num_agents(), 0);
    }

    #[test]
    fn agent_sequence_skips_system_and_keeps_repeats() {
        let trace = vec![
            event("system", "run_start", json!({})),
            completion("solver", "long enough content head for the solver"),
            verdict("REJECT"),
            completion("refiner", "refined"),
            verdict("ACCEPT"),
            event("", "noise", json!({})),
            run_end(),
        ];
        let signals = TraceSignals::extract(&trace);
        assert_eq!(
            signals.agent_sequence,
            vec!["solver", "checker", "refiner", "checker"]
        );
        assert_eq!(signals.num_agents(), 3);
        assert!(signals.ended);
    }

    #[test]
    fn first_final_answer_wins() {
        let trace = vec![
            final_extracted("solver", "12"),
            final_extracted("solver", "13"),
        ];
        assert_eq!(final_answer(&trace, SOLVER), "12");
    }

    #[test]
    fn empty_first_final_answer_does_not_fall_back() {
        let trace = vec![
            completion("solver", "The answer is 12 because of reasons"),
            final_extracted("solver", ""),
        ];
        assert_eq!(final_answer(&trace, SOLVER), "");
    }

    #[test]
    fn falls_back_to_completion_prefix() {
        let long = "x".repeat(150);
        let trace = vec![completion("refiner", &long)];
        assert_eq!(final_answer(&trace, REFINER).len(), 100);
        assert_eq!(final_answer(&trace, SOLVER), "");
    }

    #[test]
    fn verdict_and_choice_are_last_non_empty() {
        let trace = vec![
            verdict("REJECT"),
            verdict("ACCEPT"),
            verdict(""),
            decision("B"),
            event("arbiter", "decision", json!({"chosen": null})),
        ];
        assert_eq!(checker_verdict(&trace), "ACCEPT");
        assert_eq!(arbiter_choice(&trace), "B");
    }

    #[test]
    fn first_position_reports_first_occurrence() {
        let signals = TraceSignals {
            agent_sequence: vec!["checker".into(), "solver".into(), "checker".into()],
            ..TraceSignals::default()
        };
        assert_eq!(signals.first_position(CHECKER), Some(0));
        assert_eq!(signals.first_position(SOLVER), Some(1));
        assert!(!signals.ran(ARBITER));
    }
}
