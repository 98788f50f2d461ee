//! Character-based string helpers and evidence formatting.
//!
//! Evidence text follows the conventions of existing annotation files:
//! answer lists render as `['5', '0.5']` and flags as `True`/`False`.

/// Return at most the first `max_chars` characters of `value`.
pub fn head(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Render answers as a bracketed, quoted list: `['5', '1/2']`.
pub fn answer_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quoted(item)).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

// Single quotes unless the value holds a single quote and no double quote.
fn quoted(value: &str) -> String {
    let delimiter = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_keeps_short_values() {
        assert_eq!(head("abc", 10), "abc");
        assert_eq!(head("", 3), "");
    }

    #[test]
    fn head_cuts_on_char_boundaries() {
        assert_eq!(head("abcdef", 3), "abc");
        assert_eq!(head("π≈3.14", 2), "π≈");
    }

    #[test]
    fn answer_list_uses_single_quotes() {
        assert_eq!(answer_list(&[]), "[]");
        assert_eq!(
            answer_list(&["5".to_string(), "1/2".to_string()]),
            "['5', '1/2']"
        );
    }

    #[test]
    fn answer_list_escapes_quotes_and_backslashes() {
        assert_eq!(answer_list(&["it's".to_string()]), "[\"it's\"]");
        assert_eq!(
            answer_list(&[r"\frac{1}{2}".to_string()]),
            r"['\\frac{1}{2}']"
        );
        assert_eq!(answer_list(&["a'b\"c".to_string()]), r#"['a\'b"c']"#);
    }

    #[test]
    fn flags_are_capitalized() {
        assert_eq!(flag(true), "True");
        assert_eq!(flag(false), "False");
    }
}
