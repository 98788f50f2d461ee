//! Rule-based failure classification over trace signals.
//!
//! Evaluation is two-phase. Base rules are independent predicates over the
//! signals and may all fire for the same trace. Meta rules run afterwards
//! and see how many codes already matched: 4.3 needs at least two prior
//! matches, 5.1 needs none.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::answer::{answers_match, normalize_answer};
use crate::core::signals::{ARBITER, CHECKER, REFINER, SOLVER, TraceSignals};
use crate::core::taxonomy::FailureCode;
use crate::core::text::{answer_list, flag, head};
use crate::core::types::IdentifiedFailure;

/// Maximum number of agents recorded in an analysis.
pub const AGENT_SEQUENCE_CAP: usize = 10;

/// Solver completions shorter than this are treated as incomplete.
const MIN_SOLVER_CONTENT_CHARS: usize = 30;

const ACCEPT: &str = "ACCEPT";
const REJECT: &str = "REJECT";

pub const SUCCESS_SUMMARY: &str = "Success - no failure modes detected";
pub const UNKNOWN_FAILURE_SUMMARY: &str = "Failed with unknown cause";

/// Everything a rule may look at for one problem.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierInput<'a> {
    pub signals: &'a TraceSignals,
    pub success: bool,
    pub predicted: &'a str,
    pub ground_truth: &'a [String],
}

/// Classification result for one trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub num_agents: usize,
    pub agent_sequence: Vec<String>,
    pub failure_modes: BTreeMap<FailureCode, IdentifiedFailure>,
    pub summary: String,
}

struct Finding {
    evidence: String,
    phrase: &'static str,
    /// Replaces the catalog definition for this occurrence.
    definition: Option<&'static str>,
}

struct RuleContext<'a> {
    input: ClassifierInput<'a>,
    solver_correct: bool,
    refiner_correct: bool,
}

impl RuleContext<'_> {
    fn signals(&self) -> &TraceSignals {
        self.input.signals
    }
}

type Rule = fn(&RuleContext<'_>) -> Option<Finding>;
type MetaRule = fn(&RuleContext<'_>, usize) -> Option<Finding>;

const BASE_RULES: [(FailureCode, Rule); 11] = [
    (FailureCode::ImproperAgentOrder, improper_agent_order),
    (FailureCode::MissingRequiredAgent, missing_required_agent),
    (FailureCode::PrematureTermination, premature_termination),
    (FailureCode::SolverFailure, solver_failure),
    (FailureCode::CheckerIndecisiveness, checker_indecisiveness),
    (FailureCode::RefinerNoOp, refiner_no_op),
    (FailureCode::ArbiterIndecisiveness, arbiter_indecisiveness),
    (FailureCode::CheckerFalseAcceptance, checker_false_acceptance),
    (FailureCode::CheckerFalseRejection, checker_false_rejection),
    (FailureCode::RefinerDegradation, refiner_degradation),
    (FailureCode::ArbiterPoorDecision, arbiter_poor_decision),
];

const META_RULES: [(FailureCode, MetaRule); 2] = [
    (FailureCode::CoordinationFailure, coordination_failure),
    (FailureCode::ComputationalError, computational_error),
];

/// Classify one trace. Pure and deterministic.
pub fn classify(input: ClassifierInput<'_>) -> Analysis {
    let signals = input.signals;
    let ctx = RuleContext {
        input,
        solver_correct: answers_match(&signals.solver_answer, input.ground_truth),
        refiner_correct: answers_match(&signals.refiner_answer, input.ground_truth),
    };

    let mut failure_modes = BTreeMap::new();
    let mut phrases = Vec::new();
    let mut record = |code: FailureCode, finding: Finding| {
        let mode = code.mode();
        failure_modes.insert(
            code,
            IdentifiedFailure {
                name: mode.name.to_string(),
                definition: finding.definition.unwrap_or(mode.definition).to_string(),
                evidence: finding.evidence,
            },
        );
        phrases.push(finding.phrase);
    };

    let mut matched = 0;
    for (code, rule) in BASE_RULES {
        if let Some(finding) = rule(&ctx) {
            record(code, finding);
            matched += 1;
        }
    }
    for (code, rule) in META_RULES {
        if let Some(finding) = rule(&ctx, matched) {
            record(code, finding);
            matched += 1;
        }
    }

    let summary = if !phrases.is_empty() {
        phrases.join("; ")
    } else if input.success {
        SUCCESS_SUMMARY.to_string()
    } else {
        UNKNOWN_FAILURE_SUMMARY.to_string()
    };

    Analysis {
        num_agents: signals.num_agents(),
        agent_sequence: signals
            .agent_sequence
            .iter()
            .take(AGENT_SEQUENCE_CAP)
            .cloned()
            .collect(),
        failure_modes,
        summary,
    }
}

fn finding(evidence: String, phrase: &'static str) -> Option<Finding> {
    Some(Finding {
        evidence,
        phrase,
        definition: None,
    })
}

fn improper_agent_order(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    let mut issues = Vec::new();
    if let (Some(checker), Some(solver)) =
        (signals.first_position(CHECKER), signals.first_position(SOLVER))
        && checker < solver
    {
        issues.push("checker executed before solver");
    }
    if let (Some(refiner), Some(checker)) =
        (signals.first_position(REFINER), signals.first_position(CHECKER))
        && refiner < checker
    {
        issues.push("refiner executed before checker");
    }
    if issues.is_empty() {
        return None;
    }
    finding(issues.join("; "), "Improper agent order")
}

fn missing_required_agent(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    if signals.checker_verdict != REJECT || signals.ran(REFINER) {
        return None;
    }
    finding(
        format!(
            "Checker verdict={} but refiner never executed",
            signals.checker_verdict
        ),
        "Missing refiner after rejection",
    )
}

fn premature_termination(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.signals().ended && !ctx.input.predicted.is_empty() {
        return None;
    }
    finding(
        format!(
            "No run_end event or empty final answer (final_answer='{}')",
            ctx.input.predicted
        ),
        "Premature termination",
    )
}

fn solver_failure(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    let answer = &signals.solver_answer;
    let truncated_content = signals
        .solver_content_head
        .as_deref()
        .is_some_and(|content| content.chars().count() < MIN_SOLVER_CONTENT_CHARS);
    if !answer.is_empty() && !truncated_content {
        return None;
    }
    finding(
        format!(
            "Solver answer: '{}' (length={})",
            head(answer, 50),
            answer.chars().count()
        ),
        "Solver produced no/invalid answer",
    )
}

fn checker_indecisiveness(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    let verdict = signals.checker_verdict.as_str();
    if !signals.ran(CHECKER) || verdict == ACCEPT || verdict == REJECT {
        return None;
    }
    finding(
        format!("Verdict='{verdict}' (neither ACCEPT nor REJECT)"),
        "Checker indecisive",
    )
}

fn refiner_no_op(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    let (solver, refiner) = (&signals.solver_answer, &signals.refiner_answer);
    if solver.is_empty()
        || refiner.is_empty()
        || ctx.input.success
        || normalize_answer(refiner) != normalize_answer(solver)
    {
        return None;
    }
    finding(
        format!(
            "Solver='{}', Refiner='{}' (same)",
            head(solver, 30),
            head(refiner, 30)
        ),
        "Refiner made no changes",
    )
}

fn arbiter_indecisiveness(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    if !signals.ran(ARBITER) || !signals.arbiter_choice.is_empty() {
        return None;
    }
    finding(
        "Arbiter decision field is empty or missing".to_string(),
        "Arbiter failed to choose",
    )
}

fn checker_false_acceptance(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.signals().checker_verdict != ACCEPT || ctx.input.success {
        return None;
    }
    finding(
        format!(
            "Verdict=ACCEPT but answer '{}' is wrong (GT: {})",
            head(ctx.input.predicted, 30),
            answer_list(ctx.input.ground_truth)
        ),
        "False acceptance",
    )
}

fn checker_false_rejection(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.signals().checker_verdict != REJECT || !ctx.input.success {
        return None;
    }
    finding(
        format!(
            "Verdict=REJECT but final answer '{}' is correct",
            head(ctx.input.predicted, 30)
        ),
        "False rejection",
    )
}

const BROKE_CORRECT_DEFINITION: &str = "Refiner changes a correct answer to an incorrect one.";
const NO_IMPROVEMENT_DEFINITION: &str = "Refiner fails to improve or worsens the answer.";

// When the solver was right and the refiner wrong, that evidence takes
// precedence over the generic "both wrong" wording.
fn refiner_degradation(ctx: &RuleContext<'_>) -> Option<Finding> {
    let signals = ctx.signals();
    let (solver, refiner) = (&signals.solver_answer, &signals.refiner_answer);
    if solver.is_empty() || refiner.is_empty() || normalize_answer(refiner) == normalize_answer(solver)
    {
        return None;
    }
    if ctx.solver_correct && !ctx.refiner_correct {
        return Some(Finding {
            evidence: format!(
                "Solver='{}' (correct) → Refiner='{}' (wrong)",
                head(solver, 30),
                head(refiner, 30)
            ),
            phrase: "Refiner made it worse",
            definition: Some(BROKE_CORRECT_DEFINITION),
        });
    }
    if !ctx.input.success {
        return Some(Finding {
            evidence: format!(
                "Solver='{}', Refiner='{}', both wrong",
                head(solver, 30),
                head(refiner, 30)
            ),
            phrase: "Refiner didn't improve",
            definition: Some(NO_IMPROVEMENT_DEFINITION),
        });
    }
    None
}

fn arbiter_poor_decision(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.signals().ran(ARBITER)
        || ctx.input.success
        || !(ctx.solver_correct || ctx.refiner_correct)
    {
        return None;
    }
    finding(
        format!(
            "Solver correct={}, Refiner correct={}, but arbiter chose wrong answer",
            flag(ctx.solver_correct),
            flag(ctx.refiner_correct)
        ),
        "Arbiter chose wrong candidate",
    )
}

fn coordination_failure(ctx: &RuleContext<'_>, matched: usize) -> Option<Finding> {
    let num_agents = ctx.signals().num_agents();
    if num_agents < 3 || matched < 2 || ctx.input.success {
        return None;
    }
    finding(
        format!("{num_agents} agents executed, {matched} failure modes detected"),
        "Multiple coordination failures",
    )
}

fn computational_error(ctx: &RuleContext<'_>, matched: usize) -> Option<Finding> {
    if matched > 0 || ctx.input.success {
        return None;
    }
    finding(
        format!(
            "Predicted '{}', expected {} - no orchestration issues detected",
            ctx.input.predicted,
            answer_list(ctx.input.ground_truth)
        ),
        "Computational/mathematical error",
    )
}
