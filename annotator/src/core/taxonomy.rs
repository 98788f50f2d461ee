//! Fixed failure-mode taxonomy.
//!
//! Thirteen codes across five categories. The catalog is static, read-only
//! data; codes order by their dotted number, which is also the order the
//! classifier evaluates them in.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FailureCode {
    #[serde(rename = "1.1")]
    ImproperAgentOrder,
    #[serde(rename = "1.2")]
    MissingRequiredAgent,
    #[serde(rename = "1.4")]
    PrematureTermination,
    #[serde(rename = "2.1")]
    SolverFailure,
    #[serde(rename = "2.2")]
    CheckerIndecisiveness,
    #[serde(rename = "2.3")]
    RefinerNoOp,
    #[serde(rename = "2.4")]
    ArbiterIndecisiveness,
    #[serde(rename = "3.1")]
    CheckerFalseAcceptance,
    #[serde(rename = "3.2")]
    CheckerFalseRejection,
    #[serde(rename = "4.1")]
    RefinerDegradation,
    #[serde(rename = "4.2")]
    ArbiterPoorDecision,
    #[serde(rename = "4.3")]
    CoordinationFailure,
    #[serde(rename = "5.1")]
    ComputationalError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    AgentOrchestration,
    AgentOutput,
    Verification,
    Coordination,
    AnswerQuality,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::AgentOrchestration => "Agent Orchestration",
            Category::AgentOutput => "Agent Output",
            Category::Verification => "Verification",
            Category::Coordination => "Coordination",
            Category::AnswerQuality => "Answer Quality",
        }
    }
}

/// Immutable taxonomy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureMode {
    pub code: FailureCode,
    pub category: Category,
    pub name: &'static str,
    pub definition: &'static str,
}

pub static CATALOG: [FailureMode; 13] = [
    FailureMode {
        code: FailureCode::ImproperAgentOrder,
        category: Category::AgentOrchestration,
        name: "Improper Agent Order",
        definition: "Agents execute in illogical sequence (e.g., checker before solver).",
    },
    FailureMode {
        code: FailureCode::MissingRequiredAgent,
        category: Category::AgentOrchestration,
        name: "Missing Required Agent",
        definition: "Expected agent didn't run when it should have (e.g., no refiner after REJECT).",
    },
    FailureMode {
        code: FailureCode::PrematureTermination,
        category: Category::AgentOrchestration,
        name: "Premature Termination",
        definition: "Pipeline stops before reaching a valid conclusion.",
    },
    FailureMode {
        code: FailureCode::SolverFailure,
        category: Category::AgentOutput,
        name: "Solver Failure",
        definition: "Solver doesn't produce a valid or complete answer.",
    },
    FailureMode {
        code: FailureCode::CheckerIndecisiveness,
        category: Category::AgentOutput,
        name: "Checker Indecisiveness",
        definition: "Checker fails to give clear ACCEPT or REJECT verdict.",
    },
    FailureMode {
        code: FailureCode::RefinerNoOp,
        category: Category::AgentOutput,
        name: "Refiner No-Op",
        definition: "Refiner produces identical answer to solver without improvement.",
    },
    FailureMode {
        code: FailureCode::ArbiterIndecisiveness,
        category: Category::AgentOutput,
        name: "Arbiter Indecisiveness",
        definition: "Arbiter fails to select a final answer from candidates.",
    },
    FailureMode {
        code: FailureCode::CheckerFalseAcceptance,
        category: Category::Verification,
        name: "Checker False Acceptance",
        definition: "Checker accepts an incorrect solution.",
    },
    FailureMode {
        code: FailureCode::CheckerFalseRejection,
        category: Category::Verification,
        name: "Checker False Rejection",
        definition: "Checker rejects a correct solution.",
    },
    FailureMode {
        code: FailureCode::RefinerDegradation,
        category: Category::Coordination,
        name: "Refiner Degradation",
        definition: "Refiner changes a correct answer to an incorrect one, or fails to improve a wrong one.",
    },
    FailureMode {
        code: FailureCode::ArbiterPoorDecision,
        category: Category::Coordination,
        name: "Arbiter Poor Decision",
        definition: "Arbiter chooses wrong candidate when a correct one exists.",
    },
    FailureMode {
        code: FailureCode::CoordinationFailure,
        category: Category::Coordination,
        name: "Coordination Failure (Meta)",
        definition: "Multiple agents involved with compounding failures across the pipeline.",
    },
    FailureMode {
        code: FailureCode::ComputationalError,
        category: Category::AnswerQuality,
        name: "Computational Error",
        definition: "Correct approach but wrong calculation or subtle mathematical mistake.",
    },
];

impl FailureCode {
    pub const ALL: [FailureCode; 13] = [
        FailureCode::ImproperAgentOrder,
        FailureCode::MissingRequiredAgent,
        FailureCode::PrematureTermination,
        FailureCode::SolverFailure,
        FailureCode::CheckerIndecisiveness,
        FailureCode::RefinerNoOp,
        FailureCode::ArbiterIndecisiveness,
        FailureCode::CheckerFalseAcceptance,
        FailureCode::CheckerFalseRejection,
        FailureCode::RefinerDegradation,
        FailureCode::ArbiterPoorDecision,
        FailureCode::CoordinationFailure,
        FailureCode::ComputationalError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FailureCode::ImproperAgentOrder => "1.1",
            FailureCode::MissingRequiredAgent => "1.2",
            FailureCode::PrematureTermination => "1.4",
            FailureCode::SolverFailure => "2.1",
            FailureCode::CheckerIndecisiveness => "2.2",
            FailureCode::RefinerNoOp => "2.3",
            FailureCode::ArbiterIndecisiveness => "2.4",
            FailureCode::CheckerFalseAcceptance => "3.1",
            FailureCode::CheckerFalseRejection => "3.2",
            FailureCode::RefinerDegradation => "4.1",
            FailureCode::ArbiterPoorDecision => "4.2",
            FailureCode::CoordinationFailure => "4.3",
            FailureCode::ComputationalError => "5.1",
        }
    }

    /// Catalog entry for this code.
    pub fn mode(self) -> &'static FailureMode {
        // CATALOG is laid out in the same order as the enum.
        &CATALOG[self as usize]
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_code_order() {
        for code in FailureCode::ALL {
            assert_eq!(code.mode().code, code);
        }
    }

    #[test]
    fn codes_sort_by_dotted_number() {
        let mut codes: Vec<&str> = FailureCode::ALL.iter().map(|code| code.as_str()).collect();
        let before = codes.clone();
        codes.sort_unstable();
        assert_eq!(codes, before);
    }

    #[test]
    fn serializes_as_dotted_code() {
        let json = serde_json::to_string(&FailureCode::CheckerFalseAcceptance).expect("json");
        assert_eq!(json, "\"3.1\"");
        let parsed: FailureCode = serde_json::from_str("\"4.3\"").expect("parse");
        assert_eq!(parsed, FailureCode::CoordinationFailure);
    }

    #[test]
    fn five_categories_are_covered() {
        let mut categories: Vec<Category> = CATALOG.iter().map(|mode| mode.category).collect();
        categories.dedup();
        assert_eq!(categories.len(), 5);
        assert_eq!(CATALOG[12].category.label(), "Answer Quality");
    }
}
