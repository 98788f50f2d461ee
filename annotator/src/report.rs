//! Corpus-wide aggregates over a set of annotations.
//!
//! Reporting only; nothing here feeds back into classification.

use std::collections::BTreeMap;

use crate::core::taxonomy::FailureCode;
use crate::core::types::Annotation;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub annotated: usize,
    pub success: usize,
    pub failure: usize,
    /// Number of annotations containing each code, in ascending code order.
    pub mode_counts: BTreeMap<FailureCode, usize>,
}

pub fn aggregate(annotations: &[Annotation]) -> ReportSummary {
    let mut summary = ReportSummary::default();
    for annotation in annotations {
        summary.annotated += 1;
        if annotation.success {
            summary.success += 1;
        } else {
            summary.failure += 1;
        }
        for code in annotation.identified_failure_modes.keys() {
            *summary.mode_counts.entry(*code).or_insert(0) += 1;
        }
    }
    summary
}

/// Render the summary as console lines.
pub fn render(summary: &ReportSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Total annotated: {}", summary.annotated),
        format!("Success: {}", summary.success),
        format!("Failure: {}", summary.failure),
        String::new(),
        "Failure Mode Distribution:".to_string(),
    ];
    for (code, count) in &summary.mode_counts {
        lines.push(format!("  {} {}: {}", code, code.mode().name, count));
    }
    lines
}
