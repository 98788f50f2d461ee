//! Canonical form and equivalence for free-text math answers.

use std::sync::LazyLock;

use regex::Regex;

static TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\text\{([^}]+)\}").expect("text wrapper regex"));
static BOXED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\boxed\{([^}]+)\}").expect("boxed wrapper regex"));

/// Normalize an answer for comparison.
///
/// Trims, unwraps `\text{..}` and `\boxed{..}`, drops `$`, `\`, spaces and
/// braces, then lowercases. Idempotent.
pub fn normalize_answer(answer: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let unwrapped = TEXT_RE.replace_all(trimmed, "${1}");
    let unwrapped = BOXED_RE.replace_all(&unwrapped, "${1}");
    let stripped: String = unwrapped
        .chars()
        .filter(|ch| !matches!(ch, '$' | '\\' | ' ' | '{' | '}'))
        .collect();
    // Removing characters can expose whitespace at the edges.
    stripped.trim().to_lowercase()
}

/// True when `candidate` normalizes equal to any ground-truth entry.
///
/// An empty candidate never matches.
pub fn answers_match<S: AsRef<str>>(candidate: &str, ground_truth: &[S]) -> bool {
    if candidate.is_empty() {
        return false;
    }
    let normalized = normalize_answer(candidate);
    ground_truth
        .iter()
        .any(|truth| normalize_answer(truth.as_ref()) == normalized)
}
